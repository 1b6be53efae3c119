use gelscan_image::{Image, ImageError, ImageSize};

use crate::crop::crop_image;
use crate::padding::{spatial_padding, Padding2D, PaddingMode};

/// The distance metric used by the chamfer [`distance_transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    /// City-block (L1) distance: orthogonal steps cost 1, diagonal steps cost 2.
    CityBlock,
    /// Chessboard (Chebyshev) distance: every step costs 1.
    Chessboard,
}

impl DistanceMetric {
    /// (orthogonal, diagonal) step costs of the 3x3 chamfer mask.
    fn step_costs(&self) -> (f32, f32) {
        match self {
            DistanceMetric::CityBlock => (1.0, 2.0),
            DistanceMetric::Chessboard => (1.0, 1.0),
        }
    }
}

/// Compute the distance of every foreground pixel to the nearest background
/// (zero) pixel using a two-pass 3x3 chamfer transform.
///
/// Foreground pixels are those with a value greater than zero. Background
/// pixels get distance 0. An image without any background pixel gets the
/// maximal propagated distance everywhere reachable from the frame edge of
/// the scan, which for a fully-foreground image means distances grow without
/// a zero anchor; callers wanting a border-anchored transform should pad the
/// input with a zero border first (see [`center_weight_mask`]).
///
/// # Arguments
///
/// * `src` - The input image; values > 0 are foreground.
/// * `dst` - The output per-pixel distance image.
///
/// # Errors
///
/// Returns an error if the sizes differ or the image has a zero-sized dimension.
pub fn distance_transform(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    metric: DistanceMetric,
) -> Result<(), ImageError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::ZeroSizeImage(src.width(), src.height()));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let width = src.width();
    let height = src.height();
    let (orth, diag) = metric.step_costs();

    let src_data = src.as_slice();
    let dist = dst.as_slice_mut();

    for (d, &s) in dist.iter_mut().zip(src_data.iter()) {
        *d = if s > 0.0 { f32::INFINITY } else { 0.0 };
    }

    // forward pass: propagate from the top-left neighbors
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            if dist[i] == 0.0 {
                continue;
            }
            let mut best = dist[i];
            if y > 0 {
                best = best.min(dist[i - width] + orth);
                if x > 0 {
                    best = best.min(dist[i - width - 1] + diag);
                }
                if x < width - 1 {
                    best = best.min(dist[i - width + 1] + diag);
                }
            }
            if x > 0 {
                best = best.min(dist[i - 1] + orth);
            }
            dist[i] = best;
        }
    }

    // backward pass: propagate from the bottom-right neighbors
    for y in (0..height).rev() {
        for x in (0..width).rev() {
            let i = y * width + x;
            if dist[i] == 0.0 {
                continue;
            }
            let mut best = dist[i];
            if y < height - 1 {
                best = best.min(dist[i + width] + orth);
                if x > 0 {
                    best = best.min(dist[i + width - 1] + diag);
                }
                if x < width - 1 {
                    best = best.min(dist[i + width + 1] + diag);
                }
            }
            if x < width - 1 {
                best = best.min(dist[i + 1] + orth);
            }
            dist[i] = best;
        }
    }

    Ok(())
}

/// Generate a smooth center-weighting mask: 1.0 at the pixels farthest from
/// the image border, decaying toward 0.0 along the edges.
///
/// The mask is built by padding an all-ones image with a one-pixel zero
/// border, computing the city-block distance transform against that border,
/// normalizing by the global maximum distance and stripping the pad again.
///
/// # Arguments
///
/// * `size` - The requested mask size.
///
/// # Errors
///
/// Returns an error for a zero-sized request.
///
/// # Example
///
/// ```
/// use gelscan_image::ImageSize;
/// use gelscan_imgproc::mask::center_weight_mask;
///
/// let mask = center_weight_mask(ImageSize { width: 5, height: 5 }).unwrap();
/// assert_eq!(mask.get_pixel(2, 2, 0).unwrap(), &1.0);
/// assert!(*mask.get_pixel(0, 0, 0).unwrap() < 1.0);
/// ```
pub fn center_weight_mask(size: ImageSize) -> Result<Image<f32, 1>, ImageError> {
    if size.width == 0 || size.height == 0 {
        return Err(ImageError::ZeroSizeImage(size.width, size.height));
    }

    let ones = Image::<f32, 1>::from_size_val(size, 1.0)?;

    // zero border so the transform measures distance to the frame edge
    let padded_size = ImageSize {
        width: size.width + 2,
        height: size.height + 2,
    };
    let mut padded = Image::from_size_val(padded_size, 0.0)?;
    spatial_padding(&ones, &mut padded, Padding2D::all(1), PaddingMode::Constant, [0.0])?;

    let mut distances = Image::from_size_val(padded_size, 0.0)?;
    distance_transform(&padded, &mut distances, DistanceMetric::CityBlock)?;

    let max_val = distances
        .as_slice()
        .iter()
        .fold(0.0f32, |acc, &v| acc.max(v));

    // guard the numeric degeneracy of an all-zero transform
    if max_val > 0.0 {
        let inv = 1.0 / max_val;
        distances.as_slice_mut().iter_mut().for_each(|v| *v *= inv);
    }

    let mut mask = Image::from_size_val(size, 0.0)?;
    crop_image(&distances, &mut mask, 1, 1)?;

    Ok(mask)
}
