//! Error types and handling
//!
//! Decoding itself never fails: a window that does not match a symbology
//! simply produces no result. The errors here are reported once, when a
//! scanner or an image is constructed.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The configuration cannot drive a scan
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The raster has no pixels to scan
    #[error("image has zero width or height")]
    EmptyImage,

    /// The pixel buffer does not match the declared dimensions
    #[error("image data holds {actual} bytes, expected {width}x{height}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        actual: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
