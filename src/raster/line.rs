//! Line rasterizer (§4.I): a DDA walk between two clip-space endpoints,
//! perspective-correct or affine per [`InterpolationMode`].

use crate::context::{InterpolationMode, RasterState};
use crate::fragment;
use crate::framebuffer::Framebuffer;
use crate::primitives::RawLine;
use crate::shader::ShaderProgram;
use crate::varying::lerp2;

pub fn rasterize<U>(fb: &mut Framebuffer, sp: &ShaderProgram<U>, state: RasterState, line: &RawLine) {
    let mut screen = [[0.0_f64; 3]; 2];
    let mut invw = [0.0_f64; 2];
    for i in 0..2 {
        let w = line.verts[i].position[3];
        invw[i] = 1.0 / w;
        let ndc = [
            line.verts[i].position[0] * invw[i],
            line.verts[i].position[1] * invw[i],
            line.verts[i].position[2] * invw[i],
        ];
        screen[i] = fb.ndc_to_screen(ndc);
    }

    let dx = screen[1][0] - screen[0][0];
    let dy = screen[1][1] - screen[0][1];
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

    let varying_len = sp.bytes_per_varying();
    let mut interpolated = vec![0.0_f64; varying_len];

    for s in 0..=steps {
        let t = s as f64 / steps as f64;
        let x = screen[0][0] + dx * t;
        let y = screen[0][1] + dy * t;
        let (xi, yi) = (x.round(), y.round());
        if xi < 0.0 || yi < 0.0 || xi as usize >= fb.width() || yi as usize >= fb.height() {
            continue;
        }

        let z = screen[0][2] * (1.0 - t) + screen[1][2] * t;
        let invw_interp = invw[0] * (1.0 - t) + invw[1] * t;

        if varying_len > 0 {
            let (va, vb) = unsafe { (line.verts[0].varying(), line.verts[1].varying()) };
            match state.interpolation_mode {
                InterpolationMode::Perspective => {
                    let wa = (1.0 - t) * invw[0] / invw_interp;
                    let wb = t * invw[1] / invw_interp;
                    lerp2(va, vb, wa, wb, &mut interpolated);
                }
                InterpolationMode::Affine => {
                    lerp2(va, vb, 1.0 - t, t, &mut interpolated);
                }
            }
        }

        fragment::emit(
            fb,
            sp,
            xi as usize,
            yi as usize,
            [x, y, z, invw_interp],
            &interpolated,
            true,
            line.id,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RasterState;
    use crate::primitives::RawLine;
    use crate::shader::{FsIn, FsOut, ShaderProgram, VsOut};
    use std::cell::RefCell;

    fn vert(x: f64, y: f64) -> VsOut {
        VsOut::new([x, y, 0.0, 1.0], &mut [])
    }

    #[test]
    fn step_count_rounds_up_a_fractional_screen_span() {
        // width=9 -> hw=4.0; endpoints at ndc x=-0.4/0.4 give screen
        // x=2.4/5.6, a screen-space dx of 3.2. ceil(3.2)=4 steps (5
        // samples at t=0,.25,.5,.75,1 -> rounded x = 2,3,4,5,6); the old
        // round(3.2)=3 would skip x=4 entirely.
        let hits: RefCell<Vec<usize>> = RefCell::new(Vec::new());
        let sp = ShaderProgram::new(
            (),
            vec![],
            |_, _| {},
            |fs_in: FsIn<()>| {
                hits.borrow_mut().push(fs_in.frag_coord[0] as usize);
                FsOut { color: [1.0; 4], frag_depth: f64::NAN }
            },
        );
        let mut fb = Framebuffer::new(9, 9);
        let line = RawLine { verts: [vert(-0.4, 0.0), vert(0.4, 0.0)], id: 0 };
        rasterize(&mut fb, &sp, RasterState::default(), &line);

        assert!(
            hits.borrow().contains(&4),
            "expected the DDA walk to touch x=4, got {:?}",
            hits.borrow()
        );
    }
}
