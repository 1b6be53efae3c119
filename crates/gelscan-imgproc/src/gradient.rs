use gelscan_image::{ops, Image, ImageError};
use rayon::prelude::*;

use crate::enhance;
use crate::padding::PaddingMode;

/// 3x3 horizontal derivative kernel (Sobel), scale 1, no offset.
const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];

/// 3x3 vertical derivative kernel (Sobel), scale 1, no offset.
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Compute the first order image derivative in both x and y using a 3x3
/// Sobel operator with reflective (Reflect101) border handling.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W).
/// * `dx` - The destination image for the horizontal derivative.
/// * `dy` - The destination image for the vertical derivative.
///
/// # Errors
///
/// Returns an error if the images have different sizes or a zero-sized dimension.
pub fn spatial_gradient(
    src: &Image<f32, 1>,
    dx: &mut Image<f32, 1>,
    dy: &mut Image<f32, 1>,
) -> Result<(), ImageError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::ZeroSizeImage(src.width(), src.height()));
    }

    if src.size() != dx.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dx.cols(),
            dx.rows(),
        ));
    }

    if src.size() != dy.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dy.cols(),
            dy.rows(),
        ));
    }

    let rows = src.rows();
    let cols = src.cols();
    let src_data = src.as_slice();
    let border = PaddingMode::Reflect101;

    dx.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(dy.as_slice_mut().par_chunks_exact_mut(cols))
        .enumerate()
        .for_each(|(r, (dx_row, dy_row))| {
            for c in 0..cols {
                let mut sum_x = 0.0;
                let mut sum_y = 0.0;
                for (ky, (kx_row, ky_row)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
                    let sy = border.map_index(r as isize + ky as isize - 1, rows);
                    for kx in 0..3 {
                        let sx = border.map_index(c as isize + kx as isize - 1, cols);
                        let val = src_data[sy * cols + sx];
                        sum_x += val * kx_row[kx];
                        sum_y += val * ky_row[kx];
                    }
                }
                dx_row[c] = sum_x;
                dy_row[c] = sum_y;
            }
        });

    Ok(())
}

/// Compute an approximate total-gradient magnitude image.
///
/// The horizontal and vertical Sobel derivatives are taken independently,
/// converted to their absolute magnitude saturated to the 8-bit range, and
/// combined with equal weights 0.5/0.5 and zero offset.
///
/// # Arguments
///
/// * `src` - The source grayscale image.
/// * `dst` - The destination edge-magnitude image, same size as `src`.
///
/// # Errors
///
/// Returns an error if `src` has a zero-sized dimension or the sizes differ.
///
/// # Example
///
/// ```
/// use gelscan_image::{Image, ImageSize};
/// use gelscan_imgproc::gradient::gradient_magnitude;
///
/// let size = ImageSize { width: 8, height: 8 };
/// let flat = Image::<u8, 1>::from_size_val(size, 42).unwrap();
/// let mut grad = Image::<u8, 1>::from_size_val(size, 0).unwrap();
///
/// gradient_magnitude(&flat, &mut grad).unwrap();
/// assert!(grad.as_slice().iter().all(|&p| p == 0));
/// ```
pub fn gradient_magnitude(src: &Image<u8, 1>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
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

    let mut src_f32 = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    ops::cast_and_scale(src, &mut src_f32, 1.0)?;

    let mut dx = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    let mut dy = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    spatial_gradient(&src_f32, &mut dx, &mut dy)?;

    // absolute magnitude, saturated to the 8-bit range
    abs_saturate(&mut dx);
    abs_saturate(&mut dy);

    let mut combined = Image::<f32, 1>::from_size_val(src.size(), 0.0)?;
    enhance::add_weighted(&dx, 0.5, &dy, 0.5, 0.0, &mut combined)?;

    dst.as_slice_mut()
        .iter_mut()
        .zip(combined.as_slice().iter())
        .for_each(|(out, &val)| {
            *out = val.round().clamp(0.0, 255.0) as u8;
        });

    Ok(())
}

fn abs_saturate(img: &mut Image<f32, 1>) {
    img.as_slice_mut().iter_mut().for_each(|v| {
        *v = v.abs().min(255.0);
    });
}
