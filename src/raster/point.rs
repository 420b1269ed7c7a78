//! Point rasterizer (§4.J): expands a single vertex into a `point_size`
//! square of fragments, all sharing the vertex's own varying values
//! unchanged — no interpolation happens for points.

use crate::context::RasterState;
use crate::fragment;
use crate::framebuffer::Framebuffer;
use crate::primitives::RawPoint;
use crate::shader::ShaderProgram;

pub fn rasterize<U>(fb: &mut Framebuffer, sp: &ShaderProgram<U>, state: RasterState, point: &RawPoint) {
    let w = point.vertex.position[3];
    let invw = 1.0 / w;
    let ndc = [
        point.vertex.position[0] * invw,
        point.vertex.position[1] * invw,
        point.vertex.position[2] * invw,
    ];
    let screen = fb.ndc_to_screen(ndc);

    let half = state.point_size * 0.5;
    let min_x = (screen[0] - half).floor().max(0.0) as usize;
    let min_y = (screen[1] - half).floor().max(0.0) as usize;
    let max_x = ((screen[0] + half).ceil() as usize).min(fb.width());
    let max_y = ((screen[1] + half).ceil() as usize).min(fb.height());

    let varying = unsafe { point.vertex.varying() };

    for y in min_y..max_y {
        for x in min_x..max_x {
            // §4.J: only pixel centers strictly inside [center ± pointSize/2)
            // are covered. This framebuffer's pixel center for integer pixel
            // `x` is `x` itself, not `x+0.5` (ndc_to_screen maps NDC onto
            // `[0, dimension-1]` directly) — the bounding box above is a
            // superset; this test narrows it to the actual square.
            let cx = x as f64;
            let cy = y as f64;
            let inside = cx >= screen[0] - half
                && cx < screen[0] + half
                && cy >= screen[1] - half
                && cy < screen[1] + half;
            if !inside {
                continue;
            }

            fragment::emit(
                fb,
                sp,
                x,
                y,
                [cx, cy, screen[2], invw],
                varying,
                true,
                point.id,
            );
        }
    }
}
