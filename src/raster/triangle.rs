//! Triangle rasterizer (§4.H).
//!
//! Operates on a single clip-space [`RawTriangle`](crate::primitives::RawTriangle):
//! perspective divide, winding determination (with the CW-to-CCW vertex
//! swap that lets the edge functions below always assume CCW traversal),
//! viewport mapping, then a top-left-rule barycentric scan of the
//! triangle's screen-space bounding box.

use crate::context::{CullFace, FrontFace, InterpolationMode, RasterState};
use crate::fragment;
use crate::framebuffer::Framebuffer;
use crate::primitives::RawTriangle;
use crate::shader::ShaderProgram;
use crate::varying::lerp3;

const EPS: f64 = 1e-9;

#[inline]
fn edge(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// Top-left fill rule for a CCW-wound edge `a -> b`: an edge owns its
/// shared boundary pixels iff it is the triangle's top edge (horizontal,
/// pointing right) or a left edge (pointing downward in screen space).
#[inline]
fn is_top_left(a: [f64; 2], b: [f64; 2]) -> bool {
    let dy = b[1] - a[1];
    let dx = b[0] - a[0];
    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

pub fn rasterize<U>(fb: &mut Framebuffer, sp: &ShaderProgram<U>, state: RasterState, tri: &RawTriangle) {
    let mut verts = tri.verts;

    let mut ndc = [[0.0_f64; 3]; 3];
    let mut screen = [[0.0_f64; 3]; 3];
    let mut invw = [0.0_f64; 3];
    for i in 0..3 {
        let w = verts[i].position[3];
        invw[i] = 1.0 / w;
        ndc[i] = [
            verts[i].position[0] * invw[i],
            verts[i].position[1] * invw[i],
            verts[i].position[2] * invw[i],
        ];
        screen[i] = fb.ndc_to_screen(ndc[i]);
    }

    #[inline]
    fn xy(screen: &[[f64; 3]; 3], i: usize) -> [f64; 2] {
        [screen[i][0], screen[i][1]]
    }

    // §4.H step 2: orientation and front-facing are determined from the
    // NDC edges, before the framebuffer's y-flip (ndc_to_screen) is
    // applied — that flip reverses handedness and must not feed into
    // isFrontFacing.
    let ndc_area2 = edge(xy(&ndc, 0), xy(&ndc, 1), xy(&ndc, 2));
    if ndc_area2.abs() < EPS {
        return;
    }

    let is_ccw_ndc = ndc_area2 > 0.0;
    let front_facing = match state.front_face {
        FrontFace::Ccw => is_ccw_ndc,
        FrontFace::Cw => !is_ccw_ndc,
    };
    let culled = match state.cull_face {
        CullFace::None => false,
        CullFace::Front => front_facing,
        CullFace::Back => !front_facing,
        CullFace::FrontAndBack => true,
    };
    if culled {
        return;
    }

    // Canonicalize to CCW in screen space for the edge-function setup
    // below; this is a separate concern from isFrontFacing above, and its
    // sign is independent of NDC winding because of the y-flip.
    let screen_area2 = edge(xy(&screen, 0), xy(&screen, 1), xy(&screen, 2));
    if screen_area2 < 0.0 {
        verts.swap(1, 2);
        screen.swap(1, 2);
        invw.swap(1, 2);
    }

    let p0 = xy(&screen, 0);
    let p1 = xy(&screen, 1);
    let p2v = xy(&screen, 2);
    let area2 = edge(p0, p1, p2v).abs();

    let tl0 = is_top_left(p1, p2v);
    let tl1 = is_top_left(p2v, p0);
    let tl2 = is_top_left(p0, p1);

    let min_x = screen[0][0].min(screen[1][0]).min(screen[2][0]).floor().max(0.0) as usize;
    let min_y = screen[0][1].min(screen[1][1]).min(screen[2][1]).floor().max(0.0) as usize;
    let max_x = (screen[0][0].max(screen[1][0]).max(screen[2][0]).ceil() as usize).min(fb.width());
    let max_y = (screen[0][1].max(screen[1][1]).max(screen[2][1]).ceil() as usize).min(fb.height());

    let varying_len = sp.bytes_per_varying();
    let mut interpolated = vec![0.0_f64; varying_len];

    for y in min_y..max_y {
        for x in min_x..max_x {
            let sample = [x as f64, y as f64];
            let w0 = edge(p1, p2v, sample);
            let w1 = edge(p2v, p0, sample);
            let w2 = edge(p0, p1, sample);

            let inside = (w0 > 0.0 || (w0 == 0.0 && tl0))
                && (w1 > 0.0 || (w1 == 0.0 && tl1))
                && (w2 > 0.0 || (w2 == 0.0 && tl2));
            if !inside {
                continue;
            }

            let b0 = w0 / area2;
            let b1 = w1 / area2;
            let b2 = w2 / area2;

            let z = b0 * screen[0][2] + b1 * screen[1][2] + b2 * screen[2][2];
            let invw_interp = b0 * invw[0] + b1 * invw[1] + b2 * invw[2];

            if varying_len > 0 {
                let (va, vb, vc) = unsafe { (verts[0].varying(), verts[1].varying(), verts[2].varying()) };
                match state.interpolation_mode {
                    InterpolationMode::Perspective => {
                        let wa = b0 * invw[0] / invw_interp;
                        let wb = b1 * invw[1] / invw_interp;
                        let wc = b2 * invw[2] / invw_interp;
                        lerp3(va, vb, vc, wa, wb, wc, &mut interpolated);
                    }
                    InterpolationMode::Affine => {
                        lerp3(va, vb, vc, b0, b1, b2, &mut interpolated);
                    }
                }
            }

            fragment::emit(
                fb,
                sp,
                x,
                y,
                [sample[0], sample[1], z, invw_interp],
                &interpolated,
                front_facing,
                tri.id,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RasterState;
    use crate::framebuffer::Framebuffer;
    use crate::shader::{FsIn, FsOut, ShaderProgram, VsOut};
    use std::cell::RefCell;

    fn vert(x: f64, y: f64) -> VsOut {
        VsOut::new([x, y, 0.0, 1.0], &mut [])
    }

    #[test]
    fn shared_edge_triangles_never_double_draw_a_pixel() {
        // Two CCW triangles sharing the diagonal of a square, kept well
        // inside the viewport so no sample lands on the exact far corner
        // (see the top-left-rule note in DESIGN.md).
        let hits: RefCell<Vec<(usize, usize)>> = RefCell::new(Vec::new());
        let sp = ShaderProgram::new(
            (),
            vec![],
            |_, _| {},
            |fs_in: FsIn<()>| {
                hits.borrow_mut().push((fs_in.frag_coord[0] as usize, fs_in.frag_coord[1] as usize));
                FsOut { color: [1.0; 4], frag_depth: f64::NAN }
            },
        );

        let mut fb = Framebuffer::new(10, 10);
        let state = RasterState::default();

        let a = RawTriangle {
            verts: [vert(-0.8, -0.8), vert(0.8, -0.8), vert(-0.8, 0.8)],
            id: 0,
        };
        let b = RawTriangle {
            verts: [vert(0.8, -0.8), vert(0.8, 0.8), vert(-0.8, 0.8)],
            id: 1,
        };
        rasterize(&mut fb, &sp, state, &a);
        rasterize(&mut fb, &sp, state, &b);

        let hits = hits.borrow();
        let mut seen = std::collections::HashSet::new();
        for &p in hits.iter() {
            assert!(seen.insert(p), "pixel {p:?} was rasterized by both triangles along the shared edge");
        }
    }

    fn painted_count(tri: &RawTriangle, state: RasterState) -> usize {
        let hits = RefCell::new(0usize);
        let sp = ShaderProgram::new(
            (),
            vec![],
            |_, _| {},
            |_: FsIn<()>| {
                *hits.borrow_mut() += 1;
                FsOut { color: [1.0; 4], frag_depth: f64::NAN }
            },
        );
        let mut fb = Framebuffer::new(8, 8);
        rasterize(&mut fb, &sp, state, tri);
        drop(sp);
        hits.into_inner()
    }

    #[test]
    fn front_facing_is_determined_from_ndc_winding_not_screen_winding() {
        // CW in NDC: cross((1,2),(1,-2)) = -4 < 0.
        let cw_in_ndc = RawTriangle {
            verts: [vert(-1.0, -1.0), vert(0.0, 1.0), vert(1.0, -1.0)],
            id: 0,
        };
        // CCW in NDC: cross((2,0),(-1,2)) = 4 > 0.
        let ccw_in_ndc = RawTriangle {
            verts: [vert(-1.0, -1.0), vert(1.0, -1.0), vert(0.0, 1.0)],
            id: 1,
        };

        let state = RasterState {
            cull_face: CullFace::Back,
            front_face: FrontFace::Ccw,
            ..RasterState::default()
        };

        assert_eq!(
            painted_count(&cw_in_ndc, state),
            0,
            "a triangle CW in NDC with front_face=Ccw is back-facing and must be culled"
        );
        assert!(
            painted_count(&ccw_in_ndc, state) > 0,
            "a triangle CCW in NDC with front_face=Ccw is front-facing and must not be culled"
        );
    }
}
