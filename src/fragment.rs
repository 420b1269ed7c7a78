//! Shared fragment-emission logic (§4.K).
//!
//! Every rasterizer (triangle, line, point) bottoms out here once it has
//! an interpolated varying slot and a `fragCoord`: invoke the fragment
//! shader, resolve `fragDepth`, run the depth test, and — on pass — pack
//! and write the pixel.

use crate::framebuffer::{Framebuffer, Rgba8};
use crate::shader::{FsIn, ShaderProgram};

/// Runs the fragment shader at `(x, y)` and, if it survives the depth
/// test, writes color and depth into `fb` (§4.K).
#[allow(clippy::too_many_arguments)]
pub fn emit<U>(
    fb: &mut Framebuffer,
    sp: &ShaderProgram<U>,
    x: usize,
    y: usize,
    frag_coord: [f64; 4],
    interpolated: &[f64],
    front_facing: bool,
    primitive_id: u64,
) {
    let fs_in = FsIn {
        uniform: &sp.uniform,
        interpolated,
        frag_coord,
        front_facing,
        primitive_id,
    };
    let fs_out = (sp.fragment)(fs_in);

    let depth = if fs_out.frag_depth.is_nan() {
        frag_coord[2]
    } else {
        fs_out.frag_depth
    };

    if !fb.depth_test(x, y, depth) {
        return;
    }

    let to_byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    let color = Rgba8::from_components(
        to_byte(fs_out.color[0]),
        to_byte(fs_out.color[1]),
        to_byte(fs_out.color[2]),
        to_byte(fs_out.color[3]),
    );
    fb.draw_pixel(x, y, depth, color);
}
