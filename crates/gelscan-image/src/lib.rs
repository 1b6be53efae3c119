#![deny(missing_docs)]
//! Image types and traits for the gelscan analysis crates

/// image representation for the analysis operations.
pub mod image;

/// Error types for the image module.
pub mod error;

/// basic elementwise operations on images.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
