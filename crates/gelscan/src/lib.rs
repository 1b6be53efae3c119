#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use gelscan_image as image;

#[doc(inline)]
pub use gelscan_imgproc as imgproc;
