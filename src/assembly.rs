//! Primitive assembly (§4.G): resolves a draw's vertex-ID stream, drives
//! each vertex through the post-VS cache, clips triangles and lines
//! against the clip cube, and dispatches the surviving primitives to the
//! rasterizers in [`crate::raster`].

use crate::arena::Arena;
use crate::buffers::{IndexBuffer, VertexBuffer};
use crate::cache::{VaryingSlab, VertexCache};
use crate::clip;
use crate::context::{Diagnostics, RasterState};
use crate::framebuffer::Framebuffer;
use crate::primitives::{RawLine, RawPoint, RawTriangle};
use crate::raster;
use crate::shader::{ShaderProgram, VsOut};
use crate::topology::Topology;

#[allow(clippy::too_many_arguments)]
pub fn assemble_and_draw<U>(
    arena: &mut Arena,
    diag: &mut Diagnostics,
    state: RasterState,
    ib: Option<&IndexBuffer>,
    vb: &VertexBuffer,
    fb: &mut Framebuffer,
    sp: &ShaderProgram<U>,
    prim: Topology,
    start_index: usize,
    count: usize,
) {
    let resolve = |pos: usize| -> u64 {
        match ib {
            Some(ib) => ib
                .index_index(pos)
                .expect("stream position already range-checked by Context::draw"),
            None => pos as u64,
        }
    };

    let mut min_vi = u64::MAX;
    let mut max_vi = 0u64;
    let mut saw_valid = false;
    let mut saw_invalid = false;
    for pos in start_index..start_index + count {
        let vi = resolve(pos);
        if (vi as usize) < vb.vertex_count() {
            min_vi = min_vi.min(vi);
            max_vi = max_vi.max(vi);
            saw_valid = true;
        } else {
            saw_invalid = true;
        }
    }
    if saw_invalid {
        diag.error("draw references a vertex id outside the vertex buffer; affected primitives are skipped");
    }
    if !saw_valid {
        return;
    }

    let varying_len = sp.bytes_per_varying();
    let slab = VaryingSlab::new(arena, min_vi, max_vi, varying_len);
    let mut cache = VertexCache::new(arena, min_vi, max_vi);

    let mut fetch = |vi: u64| -> Option<VsOut> {
        if (vi as usize) >= vb.vertex_count() {
            return None;
        }
        let window = unsafe { slab.window_mut(vi) };
        Some(cache.fetch(vi, vb, sp, window))
    };

    let prim_count = prim.primitive_count(count);
    let mut next_id = 0u64;

    if prim.is_triangle() {
        for k in 0..prim_count {
            let (i0, i1, i2) = prim.triangle_indices(start_index, k);
            let (Some(v0), Some(v1), Some(v2)) = (fetch(resolve(i0)), fetch(resolve(i1)), fetch(resolve(i2)))
            else {
                continue;
            };
            let poly = clip::clip_triangle(arena, [v0, v1, v2], varying_len);
            poly.fan_triangulate(|a, b, c| {
                let raw = RawTriangle {
                    verts: [a, b, c],
                    id: next_id,
                };
                next_id += 1;
                raster::triangle::rasterize(fb, sp, state, &raw);
            });
        }
    } else if prim.is_line() {
        for k in 0..prim_count {
            let (i0, i1) = prim.line_indices(start_index, k, count);
            let (Some(v0), Some(v1)) = (fetch(resolve(i0)), fetch(resolve(i1))) else {
                continue;
            };
            if let Some([a, b]) = clip::clip_line(arena, v0, v1, varying_len) {
                let raw = RawLine {
                    verts: [a, b],
                    id: next_id,
                };
                next_id += 1;
                raster::line::rasterize(fb, sp, state, &raw);
            }
        }
    } else {
        for k in 0..prim_count {
            let i0 = prim.point_index(start_index, k);
            if let Some(v0) = fetch(resolve(i0)) {
                let raw = RawPoint { vertex: v0, id: next_id };
                next_id += 1;
                raster::point::rasterize(fb, sp, state, &raw);
            }
        }
    }
}
