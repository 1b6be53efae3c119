use gelscan_image::{Image, ImageError};
use rayon::prelude::*;

/// Copy the pixels of `src` into `dst` wherever `mask` marks foreground.
///
/// The mask is a binary image where the value 0 is considered as background
/// and any other value as foreground. Pixels outside the mask are set to 0.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `mask` - The single-channel mask to apply to the image.
///
/// # Example
///
/// ```
/// use gelscan_image::{Image, ImageSize};
/// use gelscan_imgproc::core::apply_mask;
///
/// let size = ImageSize { width: 2, height: 2 };
/// let image = Image::<u8, 1>::new(size, vec![10, 20, 30, 40]).unwrap();
/// let mask = Image::<u8, 1>::new(size, vec![255, 0, 255, 0]).unwrap();
/// let mut output = Image::<u8, 1>::from_size_val(size, 0).unwrap();
///
/// apply_mask(&image, &mut output, &mask).unwrap();
///
/// assert_eq!(output.as_slice(), &[10, 0, 30, 0]);
/// ```
pub fn apply_mask<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    mask: &Image<u8, 1>,
) -> Result<(), ImageError> {
    if src.size() != mask.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            mask.width(),
            mask.height(),
        ));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let cols = src.cols();
    let src_data = src.as_slice();
    let mask_data = mask.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_row = &src_data[y * cols * C..(y + 1) * cols * C];
            let mask_row = &mask_data[y * cols..(y + 1) * cols];

            dst_row
                .chunks_exact_mut(C)
                .zip(src_row.chunks_exact(C))
                .zip(mask_row.iter())
                .for_each(|((dst_pixel, src_pixel), &m)| {
                    if m != 0 {
                        dst_pixel.copy_from_slice(src_pixel);
                    } else {
                        dst_pixel.fill(0);
                    }
                });
        });

    Ok(())
}
