//! Clip-space primitive data produced by assembly (§3, §4.G) before
//! rasterizer-specific setup (perspective divide, viewport mapping,
//! barycentric initialization for triangles) runs.

use crate::shader::VsOut;

/// A clip-space triangle, post-clip, pre-divide, with a stable primitive id
/// counting survivors in emission order (§4.G).
pub struct RawTriangle {
    pub verts: [VsOut; 3],
    pub id: u64,
}

/// A clip-space line segment, post-clip, pre-divide (§4.G).
pub struct RawLine {
    pub verts: [VsOut; 2],
    pub id: u64,
}

/// A single point vertex; points are not clipped at assembly time (§4.F
/// "Points. Not clipped at this stage; the point rasterizer handles
/// off-screen bounds.").
pub struct RawPoint {
    pub vertex: VsOut,
    pub id: u64,
}
