//! Primitive topology → vertex-index resolution (§4.G).

/// A primitive topology (§6).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Topology {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Topology {
    #[inline]
    pub fn is_triangle(self) -> bool {
        matches!(
            self,
            Topology::Triangles | Topology::TriangleStrip | Topology::TriangleFan
        )
    }

    #[inline]
    pub fn is_line(self) -> bool {
        matches!(
            self,
            Topology::Lines | Topology::LineStrip | Topology::LineLoop
        )
    }

    #[inline]
    pub fn is_point(self) -> bool {
        matches!(self, Topology::Points)
    }

    /// The number of primitives this topology produces for `v` vertices
    /// starting at stream offset `b` (§4.G).
    pub fn primitive_count(self, v: usize) -> usize {
        match self {
            Topology::Points => v,
            Topology::Lines => v / 2,
            Topology::LineStrip => v.saturating_sub(1),
            Topology::LineLoop => {
                if v > 1 {
                    v
                } else {
                    0
                }
            }
            Topology::Triangles => v / 3,
            Topology::TriangleStrip | Topology::TriangleFan => v.saturating_sub(2),
        }
    }

    /// Returns the vertex-count divisibility remainder that is silently
    /// dropped for this topology, for warning purposes (§4.G, §7).
    pub fn dropped_tail(self, v: usize) -> usize {
        match self {
            Topology::Triangles => v % 3,
            Topology::Lines => v % 2,
            _ => 0,
        }
    }

    /// Stream offsets `(i0, i1, i2)` for triangle primitive `k`, relative
    /// to stream start `b` (§4.G table). Only valid when
    /// [`Topology::is_triangle`].
    pub fn triangle_indices(self, b: usize, k: usize) -> (usize, usize, usize) {
        match self {
            Topology::Triangles => (b + 3 * k, b + 3 * k + 1, b + 3 * k + 2),
            Topology::TriangleStrip => {
                if k % 2 == 1 {
                    (b + k + 1, b + k, b + k + 2)
                } else {
                    (b + k, b + k + 1, b + k + 2)
                }
            }
            Topology::TriangleFan => (b, b + k + 1, b + k + 2),
            _ => unreachable!("triangle_indices called on a non-triangle topology"),
        }
    }

    /// Stream offsets `(i0, i1)` for line primitive `k` (§4.G table). Only
    /// valid when [`Topology::is_line`].
    pub fn line_indices(self, b: usize, k: usize, v: usize) -> (usize, usize) {
        match self {
            Topology::Lines => (b + 2 * k, b + 2 * k + 1),
            Topology::LineStrip => (b + k, b + k + 1),
            Topology::LineLoop => (b + k, b + (k + 1) % v),
            _ => unreachable!("line_indices called on a non-line topology"),
        }
    }

    /// Stream offset for point primitive `k` (§4.G table). Only valid when
    /// [`Topology::is_point`].
    pub fn point_index(self, b: usize, k: usize) -> usize {
        debug_assert!(self.is_point());
        b + k
    }
}
