//! A CPU-only, single-threaded software rendering pipeline with
//! fixed-function OpenGL/Vulkan-like semantics (§1): vertex shading
//! through a post-transform cache, primitive assembly, homogeneous-space
//! clipping, perspective divide and viewport mapping, back-face culling,
//! and rasterization of triangles, lines, and points into an RGBA8888 +
//! depth [`Framebuffer`].
//!
//! Draw calls are dispatched through a [`Context`]; shaders are opaque
//! closures bound into a [`ShaderProgram`] alongside a declared
//! [`VaryingInfo`] layout.

mod arena;
mod assembly;
mod buffers;
mod cache;
mod clip;
mod context;
mod error;
mod fragment;
mod framebuffer;
mod primitives;
mod raster;
mod shader;
mod texture;
mod topology;
mod varying;

pub use buffers::{IndexBuffer, IndexType, VertexBuffer};
pub use context::{Context, ContextBuilder, CullFace, FrontFace, InterpolationMode, RasterState};
pub use error::{MessageCallback, MessageType, Severity, TextureError};
pub use framebuffer::{Framebuffer, Rgba8};
pub use shader::{FragmentShader, FsIn, FsOut, ShaderProgram, VertexShader, VsIn, VsOut};
pub use texture::{FilterMode, Texture, WrapMode};
pub use topology::Topology;
pub use varying::{ElemType, VaryingInfo, VaryingSlot};
