//! Post-vertex-shader cache (§4.E, §9).
//!
//! Given a draw's resolved vertex-ID range `[min_vi, max_vi]`, the cache is
//! a dense array of size `max_vi - min_vi + 1`, each slot either empty or
//! holding a cached [`VsOut`]. `fetch(vi)` invokes the vertex shader at
//! most once per unique `vi` within a draw call — the idempotence property
//! §8 requires. Per §9's design note, this wastes space for sparse index
//! sets in exchange for O(1), hash-free lookups; the spec fixes that
//! trade-off and this implementation follows it.
//!
//! Both the cache's entry table and its varying slab are allocated from the
//! draw's [`Arena`](crate::arena::Arena), so they die with the rest of the
//! draw's workspace at `reset`.

use crate::arena::Arena;
use crate::buffers::VertexBuffer;
use crate::shader::{ShaderProgram, VsIn, VsOut};

#[repr(C)]
#[derive(Copy, Clone)]
struct Entry {
    valid: bool,
    out: VsOut,
}

/// The post-VS cache for a single draw call (§4.E).
///
/// Holds a raw pointer into the arena rather than a borrowed slice: like
/// [`VsOut`], its validity is tied to "until the next `Arena::reset`", not
/// to any borrow-checker-visible lifetime, so assembly code can keep
/// allocating from the same arena (clip workspaces, primitive arrays)
/// while the cache is in use.
pub struct VertexCache {
    min_vi: u64,
    entries_ptr: *mut Entry,
    len: usize,
}

impl VertexCache {
    /// Allocates (from `arena`) a cache table sized for the inclusive
    /// vertex-ID range `[min_vi, max_vi]`.
    pub fn new(arena: &mut Arena, min_vi: u64, max_vi: u64) -> Self {
        let count = (max_vi - min_vi + 1) as usize;
        let ptr = unsafe { arena.calloc(count * std::mem::size_of::<Entry>()) as *mut Entry };
        Self {
            min_vi,
            entries_ptr: ptr,
            len: count,
        }
    }

    #[inline]
    fn entries(&mut self) -> &mut [Entry] {
        unsafe { std::slice::from_raw_parts_mut(self.entries_ptr, self.len) }
    }

    /// Fetches the cached vertex-shader output for vertex id `vi`,
    /// invoking the vertex shader through `program` on a cache miss.
    /// `varying_slab` is the slab of `bytes_per_varying/8` `f64`s reserved
    /// for this vertex's varyings (see [`VaryingSlab`]).
    pub fn fetch<U>(
        &mut self,
        vi: u64,
        vertex_buffer: &VertexBuffer,
        program: &ShaderProgram<U>,
        varying_slab: &mut [f64],
    ) -> VsOut {
        let idx = (vi - self.min_vi) as usize;
        let entry = &mut self.entries()[idx];
        if entry.valid {
            return entry.out;
        }

        let vertex_bytes = vertex_buffer
            .index_vertex(vi)
            .expect("vertex id resolved out of range of the vertex buffer");
        let mut out = VsOut::new([0.0, 0.0, 0.0, 1.0], varying_slab);
        let vs_in = VsIn {
            uniform: &program.uniform,
            vertex: vertex_bytes,
            vertex_id: vi,
        };
        (program.vertex)(vs_in, &mut out);

        entry.out = out;
        entry.valid = true;
        out
    }
}

/// Owns the per-vertex varying slab for a draw's cache, handing out
/// disjoint `&mut [f64]` windows by vertex id. Like [`VertexCache`], this
/// carries a raw pointer rather than a lifetime-bound slice so the arena
/// remains free for further allocation while the slab is in use.
pub struct VaryingSlab {
    min_vi: u64,
    bytes_per_varying_f64: usize,
    data_ptr: *mut f64,
}

impl VaryingSlab {
    pub fn new(arena: &mut Arena, min_vi: u64, max_vi: u64, bytes_per_varying_f64: usize) -> Self {
        let count = (max_vi - min_vi + 1) as usize;
        let ptr = unsafe {
            arena.calloc(count * bytes_per_varying_f64 * std::mem::size_of::<f64>()) as *mut f64
        };
        Self {
            min_vi,
            bytes_per_varying_f64,
            data_ptr: ptr,
        }
    }

    /// Returns the window of `f64`s reserved for vertex `vi`.
    ///
    /// # Safety
    /// Callers must not call this twice for the same `vi` while holding
    /// both results live simultaneously (aliasing).
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn window_mut(&self, vi: u64) -> &mut [f64] {
        let idx = (vi - self.min_vi) as usize;
        let start = idx * self.bytes_per_varying_f64;
        let ptr = self.data_ptr.add(start);
        std::slice::from_raw_parts_mut(ptr, self.bytes_per_varying_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{FsIn, FsOut};
    use crate::varying::VaryingInfo;
    use std::cell::Cell;

    #[test]
    fn fetch_invokes_vertex_shader_exactly_once_per_id() {
        let mut arena = Arena::new();
        let vb = VertexBuffer::copy_data(4, &[0u8; 4 * 5]);
        let invocations = Cell::new(0usize);
        let program = ShaderProgram::new(
            (),
            vec![VaryingInfo::f64(1)],
            |vs_in: VsIn<()>, out: &mut VsOut| {
                invocations.set(invocations.get() + 1);
                out.position = [vs_in.vertex_id as f64, 0.0, 0.0, 1.0];
                unsafe { out.varying_mut()[0] = vs_in.vertex_id as f64 };
            },
            |_: FsIn<()>| FsOut::default(),
        );

        let slab = VaryingSlab::new(&mut arena, 0, 4, program.bytes_per_varying());
        let mut cache = VertexCache::new(&mut arena, 0, 4);

        for _ in 0..3 {
            let window = unsafe { slab.window_mut(2) };
            let out = cache.fetch(2, &vb, &program, window);
            assert_eq!(out.position[0], 2.0);
        }
        assert_eq!(invocations.get(), 1);

        let window = unsafe { slab.window_mut(4) };
        cache.fetch(4, &vb, &program, window);
        assert_eq!(invocations.get(), 2);
    }
}
