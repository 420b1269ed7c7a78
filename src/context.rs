//! Draw dispatcher + process-wide context (§4.L).
//!
//! The context is a flat record, not a state machine — there is no
//! bind/unbind protocol (§4.L). It is constructed once via
//! [`ContextBuilder`] (§2.3) and then threaded through draw calls.

use crate::arena::Arena;
use crate::assembly;
use crate::buffers::{IndexBuffer, VertexBuffer};
use crate::error::{MessageCallback, MessageType, Severity};
use crate::framebuffer::Framebuffer;
use crate::shader::ShaderProgram;
use crate::topology::Topology;

/// Interpolation mode used by the triangle rasterizer (§4.H, §4.L).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InterpolationMode {
    Perspective,
    Affine,
}

/// Which winding order is considered front-facing (§4.H, §4.L).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrontFace {
    Ccw,
    Cw,
}

/// Which winding(s) to cull (§4.H, §4.L).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CullFace {
    None,
    Front,
    Back,
    FrontAndBack,
}

/// The flat rasterizer state shared by every stage of a draw call (§4.L).
/// `Copy` so it can be handed to assembly/rasterizer code alongside a
/// disjoint borrow of the arena and the message callback.
#[derive(Copy, Clone, Debug)]
pub struct RasterState {
    pub interpolation_mode: InterpolationMode,
    pub front_face: FrontFace,
    pub cull_face: CullFace,
    pub point_size: f64,
}

impl Default for RasterState {
    fn default() -> Self {
        Self {
            interpolation_mode: InterpolationMode::Perspective,
            front_face: FrontFace::Ccw,
            cull_face: CullFace::None,
            point_size: 1.0,
        }
    }
}

/// Routes messages to the user's callback (§6) and, per §2.1, mirrors them
/// through `tracing` so host applications get structured logs even before
/// they've wired up a callback.
pub struct Diagnostics<'a> {
    callback: &'a mut Option<MessageCallback>,
    source_name: &'static str,
}

impl<'a> Diagnostics<'a> {
    pub fn emit(&mut self, ty: MessageType, severity: Severity, text: &str) {
        match severity {
            Severity::High => tracing::error!(source = self.source_name, "{text}"),
            Severity::Medium => tracing::warn!(source = self.source_name, "{text}"),
            Severity::Low => tracing::debug!(source = self.source_name, "{text}"),
        }
        if let Some(cb) = self.callback.as_mut() {
            cb(ty, severity, self.source_name, text);
        }
    }

    pub(crate) fn warn(&mut self, text: &str) {
        self.emit(MessageType::Warning, Severity::Low, text);
    }

    pub(crate) fn error(&mut self, text: &str) {
        self.emit(MessageType::Error, Severity::High, text);
    }
}

/// Builds a [`Context`] with documented defaults for every field (§2.3).
#[derive(Default)]
pub struct ContextBuilder {
    state: RasterState,
    message_callback: Option<MessageCallback>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interpolation_mode(mut self, mode: InterpolationMode) -> Self {
        self.state.interpolation_mode = mode;
        self
    }

    pub fn front_face(mut self, front_face: FrontFace) -> Self {
        self.state.front_face = front_face;
        self
    }

    pub fn cull_face(mut self, cull_face: CullFace) -> Self {
        self.state.cull_face = cull_face;
        self
    }

    pub fn point_size(mut self, point_size: f64) -> Self {
        self.state.point_size = point_size;
        self
    }

    pub fn message_callback(mut self, callback: MessageCallback) -> Self {
        self.message_callback = Some(callback);
        self
    }

    pub fn build(self) -> Context {
        Context {
            state: self.state,
            message_callback: self.message_callback,
            arena: Arena::new(),
        }
    }
}

/// The process-wide pipeline context (§4.L): rasterizer state, message
/// callback, and the draw-call arena. Flat record, no bind/unbind
/// protocol.
pub struct Context {
    state: RasterState,
    message_callback: Option<MessageCallback>,
    arena: Arena,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    pub fn state(&self) -> RasterState {
        self.state
    }

    pub fn set_interpolation_mode(&mut self, mode: InterpolationMode) {
        self.state.interpolation_mode = mode;
    }

    pub fn set_front_face(&mut self, front_face: FrontFace) {
        self.state.front_face = front_face;
    }

    pub fn set_cull_face(&mut self, cull_face: CullFace) {
        self.state.cull_face = cull_face;
    }

    pub fn set_point_size(&mut self, point_size: f64) {
        self.state.point_size = point_size;
    }

    /// Draws `count` vertices taken directly from `vb` starting at
    /// `start_index` (§6).
    pub fn draw_vertex_buffer<U>(
        &mut self,
        vb: &VertexBuffer,
        fb: &mut Framebuffer,
        sp: &ShaderProgram<U>,
        prim: Topology,
        start_index: usize,
        count: usize,
    ) {
        self.draw(None, vb, fb, sp, prim, start_index, count);
    }

    /// Draws `count` vertices resolved through `ib` starting at
    /// `start_index` into the index stream (§6).
    pub fn draw_index_buffer<U>(
        &mut self,
        ib: &IndexBuffer,
        vb: &VertexBuffer,
        fb: &mut Framebuffer,
        sp: &ShaderProgram<U>,
        prim: Topology,
        start_index: usize,
        count: usize,
    ) {
        self.draw(Some(ib), vb, fb, sp, prim, start_index, count);
    }

    fn draw<U>(
        &mut self,
        ib: Option<&IndexBuffer>,
        vb: &VertexBuffer,
        fb: &mut Framebuffer,
        sp: &ShaderProgram<U>,
        prim: Topology,
        start_index: usize,
        count: usize,
    ) {
        let _span = tracing::debug_span!("draw", ?prim, start_index, count).entered();

        if count == 0 {
            return;
        }

        let Context {
            state,
            message_callback,
            arena,
        } = self;
        let mut diag = Diagnostics {
            callback: message_callback,
            source_name: "rasterrs",
        };

        let stream_len = ib.map(|b| b.len()).unwrap_or_else(|| vb.vertex_count());
        let last = start_index.checked_add(count).and_then(|n| n.checked_sub(1));
        if last.is_none() || last.unwrap() >= stream_len {
            diag.error(&format!(
                "draw range [{start_index}, {}) exceeds buffer length {stream_len}",
                start_index + count
            ));
            return;
        }

        if prim.is_triangle() && state.cull_face == CullFace::FrontAndBack {
            arena.reset();
            return;
        }

        let dropped = prim.dropped_tail(count);
        if dropped != 0 {
            diag.warn(&format!(
                "{count} vertices is not evenly divisible for {prim:?}; dropping the trailing {dropped}"
            ));
        }

        assembly::assemble_and_draw(
            arena, &mut diag, *state, ib, vb, fb, sp, prim, start_index, count,
        );

        arena.reset();
    }
}
