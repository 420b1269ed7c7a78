//! Homogeneous clip-space clipping (§4.F).
//!
//! Both triangle and line clipping operate *before* perspective divide,
//! against the six canonical half-spaces of the clip cube `|x|,|y|,|z| <=
//! w`. Every vertex this module emits — whether a deep copy of an input
//! vertex or a newly interpolated crossing point — gets its own
//! arena-allocated varying slab, per §9's note that the clip workspace
//! must own its varyings separately from the post-VS cache.

use crate::arena::Arena;
use crate::shader::VsOut;

const EPS: f64 = 1e-9;

#[derive(Copy, Clone)]
enum Plane {
    Left,
    Right,
    Bottom,
    Top,
    Near,
    Far,
}

const PLANES: [Plane; 6] = [
    Plane::Left,
    Plane::Right,
    Plane::Bottom,
    Plane::Top,
    Plane::Near,
    Plane::Far,
];

#[inline]
fn distance(plane: Plane, p: [f64; 4]) -> f64 {
    let [x, y, z, w] = p;
    match plane {
        Plane::Left => x + w,
        Plane::Right => w - x,
        Plane::Bottom => y + w,
        Plane::Top => w - y,
        Plane::Near => z + w,
        Plane::Far => w - z,
    }
}

/// The conservative polygon-buffer bound §4.F permits (worst case after 6
/// planes is 9 vertices).
pub const MAX_POLYGON_VERTS: usize = 16;

/// A fixed-capacity polygon buffer of clip-space vertices.
pub struct Polygon {
    verts: [Option<VsOut>; MAX_POLYGON_VERTS],
    len: usize,
}

impl Polygon {
    fn empty() -> Self {
        Self {
            verts: [None; MAX_POLYGON_VERTS],
            len: 0,
        }
    }

    fn push(&mut self, v: VsOut) {
        assert!(
            self.len < MAX_POLYGON_VERTS,
            "clip polygon exceeded the conservative {MAX_POLYGON_VERTS}-vertex bound"
        );
        self.verts[self.len] = Some(v);
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, i: usize) -> VsOut {
        self.verts[i].unwrap()
    }

    /// Fan-triangulates the clipped polygon: `(v0, vi, vi+1)` for `i =
    /// 1..n-2`, invoking `f` for each triangle.
    pub fn fan_triangulate(&self, mut f: impl FnMut(VsOut, VsOut, VsOut)) {
        if self.len < 3 {
            return;
        }
        let v0 = self.get(0);
        for i in 1..self.len - 1 {
            f(v0, self.get(i), self.get(i + 1));
        }
    }
}

fn copy_vertex(arena: &mut Arena, v: &VsOut, varying_len: usize) -> VsOut {
    let slab = unsafe {
        let ptr = arena.alloc(varying_len * std::mem::size_of::<f64>()) as *mut f64;
        std::slice::from_raw_parts_mut(ptr, varying_len)
    };
    slab.copy_from_slice(unsafe { v.varying() });
    VsOut::new(v.position, slab)
}

fn lerp_vertex(arena: &mut Arena, a: &VsOut, b: &VsOut, t: f64, varying_len: usize) -> VsOut {
    let slab = unsafe {
        let ptr = arena.alloc(varying_len * std::mem::size_of::<f64>()) as *mut f64;
        std::slice::from_raw_parts_mut(ptr, varying_len)
    };
    let (av, bv) = unsafe { (a.varying(), b.varying()) };
    crate::varying::lerp2(av, bv, 1.0 - t, t, slab);
    let mut position = [0.0; 4];
    for (i, p) in position.iter_mut().enumerate() {
        *p = a.position[i] * (1.0 - t) + b.position[i] * t;
    }
    VsOut::new(position, slab)
}

/// Clips a triangle against all six clip planes via Sutherland–Hodgman
/// (§4.F). Returns the resulting convex polygon (possibly empty, meaning
/// "fully clipped").
pub fn clip_triangle(arena: &mut Arena, tri: [VsOut; 3], varying_len: usize) -> Polygon {
    let mut poly = Polygon::empty();
    for v in &tri {
        poly.push(copy_vertex(arena, v, varying_len));
    }

    for &plane in &PLANES {
        if poly.is_empty() {
            break;
        }
        let mut next = Polygon::empty();
        let n = poly.len();
        for i in 0..n {
            let curr = poly.get(i);
            let nxt = poly.get((i + 1) % n);
            let d_curr = distance(plane, curr.position);
            let d_next = distance(plane, nxt.position);

            let curr_inside = d_curr > 0.0;
            let next_inside = d_next > 0.0;
            let near_degenerate = (d_curr - d_next).abs() <= EPS;

            if curr_inside && next_inside {
                next.push(nxt);
            } else if !near_degenerate && curr_inside != next_inside {
                let t = d_curr / (d_curr - d_next);
                let crossing = lerp_vertex(arena, &curr, &nxt, t, varying_len);
                next.push(crossing);
                if next_inside {
                    next.push(nxt);
                }
            } else if near_degenerate && curr_inside {
                next.push(nxt);
            }
            // both outside (or near-degenerate-and-outside): emit nothing.
        }
        poly = next;
    }

    poly
}

/// Clips a line segment against all six clip planes via Liang–Barsky
/// (§4.F). Returns `None` if the segment is fully clipped, else the
/// (possibly shortened) endpoint pair.
pub fn clip_line(arena: &mut Arena, a: VsOut, b: VsOut, varying_len: usize) -> Option<[VsOut; 2]> {
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for &plane in &PLANES {
        let da = distance(plane, a.position);
        let db = distance(plane, b.position);

        if da < 0.0 && db < 0.0 {
            return None;
        }
        if (da - db).abs() > EPS {
            let one_negative = (da < 0.0) != (db < 0.0);
            if one_negative {
                let t = da / (da - db);
                if da < 0.0 {
                    t0 = t0.max(t);
                } else {
                    t1 = t1.min(t);
                }
            }
        }
        if t0 > t1 {
            return None;
        }
    }

    let out_a = if t0 > 0.0 {
        lerp_vertex(arena, &a, &b, t0, varying_len)
    } else {
        copy_vertex(arena, &a, varying_len)
    };
    let out_b = if t1 < 1.0 {
        lerp_vertex(arena, &a, &b, t1, varying_len)
    } else {
        copy_vertex(arena, &b, varying_len)
    };

    Some([out_a, out_b])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(arena: &mut Arena, pos: [f64; 4]) -> VsOut {
        let slab = unsafe {
            let ptr = arena.alloc(0) as *mut f64;
            std::slice::from_raw_parts_mut(ptr, 0)
        };
        VsOut::new(pos, slab)
    }

    #[test]
    fn fully_inside_triangle_passes_through_unchanged() {
        let mut arena = Arena::new();
        let tri = [
            vertex(&mut arena, [0.0, 0.0, 0.0, 1.0]),
            vertex(&mut arena, [0.5, 0.0, 0.0, 1.0]),
            vertex(&mut arena, [0.0, 0.5, 0.0, 1.0]),
        ];
        let poly = clip_triangle(&mut arena, tri, 0);
        assert_eq!(poly.len(), 3);
        assert_eq!(poly.get(0).position, tri[0].position);
        assert_eq!(poly.get(1).position, tri[1].position);
        assert_eq!(poly.get(2).position, tri[2].position);
    }

    #[test]
    fn clipping_soundness_every_output_vertex_inside_planes() {
        let mut arena = Arena::new();
        let tri = [
            vertex(&mut arena, [0.0, 0.0, 0.0, 1.0]),
            vertex(&mut arena, [3.0, 0.0, 0.0, 1.0]),
            vertex(&mut arena, [0.0, 3.0, 0.0, 1.0]),
        ];
        let poly = clip_triangle(&mut arena, tri, 0);
        assert!(poly.len() >= 3);
        for i in 0..poly.len() {
            let p = poly.get(i).position;
            for &plane in &PLANES {
                assert!(distance(plane, p) >= -1e-6);
            }
        }
    }

    #[test]
    fn fully_outside_triangle_clips_to_empty() {
        let mut arena = Arena::new();
        let tri = [
            vertex(&mut arena, [2.0, 2.0, 0.0, 1.0]),
            vertex(&mut arena, [3.0, 2.0, 0.0, 1.0]),
            vertex(&mut arena, [2.0, 3.0, 0.0, 1.0]),
        ];
        let poly = clip_triangle(&mut arena, tri, 0);
        assert!(poly.is_empty());
    }

    #[test]
    fn line_fully_outside_is_clipped() {
        let mut arena = Arena::new();
        let a = vertex(&mut arena, [2.0, 2.0, 0.0, 1.0]);
        let b = vertex(&mut arena, [3.0, 2.0, 0.0, 1.0]);
        assert!(clip_line(&mut arena, a, b, 0).is_none());
    }

    #[test]
    fn line_partially_outside_is_shortened_inside_cube() {
        let mut arena = Arena::new();
        let a = vertex(&mut arena, [-2.0, 0.0, 0.0, 1.0]);
        let b = vertex(&mut arena, [2.0, 0.0, 0.0, 1.0]);
        let [ca, cb] = clip_line(&mut arena, a, b, 0).unwrap();
        assert!((ca.position[0] - -1.0).abs() < 1e-9);
        assert!((cb.position[0] - 1.0).abs() < 1e-9);
    }
}
