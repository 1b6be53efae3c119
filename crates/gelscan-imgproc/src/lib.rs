#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// image basic operations module.
pub mod core;

/// image cropping module.
pub mod crop;

/// utilities to draw on images.
pub mod draw;

/// image enhancement module.
pub mod enhance;

/// adaptive background subtraction over image sequences.
pub mod foreground;

/// edge-magnitude computation module.
pub mod gradient;

/// compute image histogram module.
pub mod histogram;

/// center-weighted mask synthesis via distance transforms.
pub mod mask;

/// morphological filtering module.
pub mod morphology;

/// spatial padding utilities.
pub mod padding;

/// module containing parallelization utilities.
pub mod parallel;

/// pixel-scanning region localization module.
pub mod region;
