//! Vertex/fragment shader contracts (§6, §9).
//!
//! Shaders are opaque user callbacks (§1): the pipeline never inspects
//! their bodies, only calls through the documented signature. Per §9's
//! design note, `VsOut`'s "pointer into a varying slab" becomes a raw
//! pointer + length pair here rather than index/stride arithmetic exposed
//! to the shader author, because the shader needs an ergonomic `&mut [f64]`
//! to write into; the index/stride arithmetic happens one layer down, in
//! [`crate::cache`] and [`crate::clip`], which are the code that actually
//! owns the backing slabs.

use crate::varying::VaryingInfo;

/// Input to the vertex shader: `{uniform, pVertex, vertexID}` (§6).
pub struct VsIn<'a, U> {
    pub uniform: &'a U,
    /// Points into the user's vertex buffer at this vertex's bytes; the
    /// pipeline never interprets them (§3).
    pub vertex: &'a [u8],
    pub vertex_id: u64,
}

/// Vertex shader output: four `f64`s of clip-space position plus a pointer
/// into a varying slab owned by the pipeline (§3, §6).
///
/// `VsOut` is a thin, `Copy` handle — cheap to store in the post-VS cache
/// and in clipped-polygon workspaces. The varying pointer is only valid
/// until the [`crate::arena::Arena`] that backs it is next reset.
#[derive(Copy, Clone, Debug)]
pub struct VsOut {
    pub position: [f64; 4],
    varying_ptr: *mut f64,
    varying_len: usize,
}

impl VsOut {
    /// Constructs a handle over a varying slab slice. `slab` must outlive
    /// every use of the returned `VsOut` up to the arena's next reset.
    #[inline]
    pub(crate) fn new(position: [f64; 4], slab: &mut [f64]) -> Self {
        Self {
            position,
            varying_ptr: slab.as_mut_ptr(),
            varying_len: slab.len(),
        }
    }

    #[inline]
    pub fn invw(&self) -> f64 {
        1.0 / self.position[3]
    }

    /// # Safety
    /// The backing arena must not have been reset since this handle was
    /// produced.
    #[inline]
    pub unsafe fn varying(&self) -> &[f64] {
        std::slice::from_raw_parts(self.varying_ptr, self.varying_len)
    }

    /// # Safety
    /// The backing arena must not have been reset since this handle was
    /// produced, and no other live reference to the same slab may exist.
    #[inline]
    pub unsafe fn varying_mut(&mut self) -> &mut [f64] {
        std::slice::from_raw_parts_mut(self.varying_ptr, self.varying_len)
    }
}

/// `(in: VsIn, out: VsOut) -> ()` (§6). `out`'s varying pointer is already
/// wired up to this vertex's slot in the cache's slab before the shader
/// runs; the shader only needs to fill in `out.position` and the varying
/// values.
pub type VertexShader<'a, U> = dyn Fn(VsIn<U>, &mut VsOut) + 'a;

/// Input to the fragment shader: `{uniform, interpolated, fragCoord,
/// frontFacing, primitiveID}` (§6).
pub struct FsIn<'a, U> {
    pub uniform: &'a U,
    pub interpolated: &'a [f64],
    pub frag_coord: [f64; 4],
    pub front_facing: bool,
    pub primitive_id: u64,
}

/// `{color[4] in [0,1], fragDepth}` where `fragDepth` defaults to `NaN`,
/// meaning "use `fragCoord.z`" (§6).
#[derive(Copy, Clone, Debug)]
pub struct FsOut {
    pub color: [f64; 4],
    pub frag_depth: f64,
}

impl Default for FsOut {
    fn default() -> Self {
        Self {
            color: [0.0; 4],
            frag_depth: f64::NAN,
        }
    }
}

/// `(in: FsIn, out: FsOut) -> ()` (§6).
pub type FragmentShader<'a, U> = dyn Fn(FsIn<U>) -> FsOut + 'a;

/// A bound pair of shader closures plus the uniform data and varying
/// layout they agree on (§6, §9).
pub struct ShaderProgram<'a, U> {
    pub uniform: U,
    pub varying_layout: Vec<VaryingInfo>,
    pub vertex: Box<VertexShader<'a, U>>,
    pub fragment: Box<FragmentShader<'a, U>>,
}

impl<'a, U> ShaderProgram<'a, U> {
    pub fn new(
        uniform: U,
        varying_layout: Vec<VaryingInfo>,
        vertex: impl Fn(VsIn<U>, &mut VsOut) + 'a,
        fragment: impl Fn(FsIn<U>) -> FsOut + 'a,
    ) -> Self {
        Self {
            uniform,
            varying_layout,
            vertex: Box::new(vertex),
            fragment: Box::new(fragment),
        }
    }

    #[inline]
    pub fn bytes_per_varying(&self) -> usize {
        crate::varying::layout_byte_size(&self.varying_layout) / std::mem::size_of::<f64>()
    }
}
