use gelscan_image::{Image, ImageError};

use crate::parallel;

/// Convert a grayscale image to RGB by replicating the intensity into all
/// three channels.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output RGB image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use gelscan_image::{Image, ImageSize};
/// use gelscan_imgproc::color::rgb_from_gray_u8;
///
/// let gray = Image::<u8, 1>::new(
///     ImageSize { width: 2, height: 1 },
///     vec![0u8, 128],
/// ).unwrap();
///
/// let mut rgb = Image::<u8, 3>::from_size_val(gray.size(), 0).unwrap();
///
/// rgb_from_gray_u8(&gray, &mut rgb).unwrap();
/// assert_eq!(rgb.as_slice(), &[0, 0, 0, 128, 128, 128]);
/// ```
pub fn rgb_from_gray_u8(src: &Image<u8, 1>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.fill(src_pixel[0]);
    });

    Ok(())
}
