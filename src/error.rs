//! Ambient error types (§2.2, §7): the message-callback vocabulary and the
//! one typed, `Result`-returning failure mode in the crate (texture
//! loading, which happens before any draw call and so has a normal
//! call-and-return channel available).

use thiserror::Error;

/// Severity of a message delivered through the [`MessageCallback`]
/// (§6, §7).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// The kind of condition a message describes (§6).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Error,
    Warning,
    Info,
}

/// `(type, severity, source_name, text) -> ()` (§6). The user parameter is
/// whatever state the closure itself captures.
pub type MessageCallback = Box<dyn FnMut(MessageType, Severity, &str, &str)>;

/// Resource-failure errors from loading a texture's backing image (§2.2,
/// §7 "Resource failure").
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read image file {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
