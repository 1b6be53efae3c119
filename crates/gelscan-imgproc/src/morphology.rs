use gelscan_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

use crate::padding::{spatial_padding, Padding2D, PaddingMode};

/// A rectangular morphological structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    width: usize,
    height: usize,
}

impl StructuringElement {
    /// Create a rectangular structuring element of the given extent.
    ///
    /// Extents are clamped to at least one pixel.
    pub fn rect(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width of the element in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the element in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Anchor offsets (x, y) of the element, at its center.
    fn anchor(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }
}

fn morph_extremum(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &StructuringElement,
    pad_value: u8,
    take_max: bool,
) -> Result<(), ImageError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::ZeroSizeImage(src.width(), src.height()));
    }

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }

    let width = src.width();
    let (anchor_x, anchor_y) = kernel.anchor();
    // pad enough for the window to stay in bounds on both sides
    let pad_w = kernel.width;
    let pad_h = kernel.height;

    let padded_size = ImageSize {
        width: width + 2 * pad_w,
        height: src.height() + 2 * pad_h,
    };
    let mut padded = Image::from_size_val(padded_size, pad_value)?;
    spatial_padding(
        src,
        &mut padded,
        Padding2D {
            top: pad_h,
            bottom: pad_h,
            left: pad_w,
            right: pad_w,
        },
        PaddingMode::Constant,
        [pad_value],
    )?;

    let padded_data = padded.as_slice();
    let padded_width = padded_size.width;

    dst.as_slice_mut()
        .par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for (x, out) in dst_row.iter_mut().enumerate() {
                // window top-left in padded coordinates
                let wy = y + pad_h - anchor_y;
                let wx = x + pad_w - anchor_x;

                let mut extremum = padded_data[wy * padded_width + wx];
                for ky in 0..kernel.height {
                    let row_offset = (wy + ky) * padded_width + wx;
                    for val in &padded_data[row_offset..row_offset + kernel.width] {
                        extremum = if take_max {
                            extremum.max(*val)
                        } else {
                            extremum.min(*val)
                        };
                    }
                }
                *out = extremum;
            }
        });

    Ok(())
}

/// Erode an image with a rectangular [`StructuringElement`].
///
/// Each pixel is replaced by the minimum value in the neighborhood defined
/// by the element. The border is padded with `u8::MAX` so that pixels near
/// the frame edge are not eroded by the pad.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The structuring element.
pub fn erode(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &StructuringElement,
) -> Result<(), ImageError> {
    morph_extremum(src, dst, kernel, u8::MAX, false)
}

/// Dilate an image with a rectangular [`StructuringElement`].
///
/// Each pixel is replaced by the maximum value in the neighborhood defined
/// by the element. The border is padded with zero.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The structuring element.
pub fn dilate(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &StructuringElement,
) -> Result<(), ImageError> {
    morph_extremum(src, dst, kernel, 0, true)
}

/// Morphological opening: erosion followed by dilation.
///
/// Removes structures smaller than the element while preserving larger ones.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The structuring element.
pub fn open(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel: &StructuringElement,
) -> Result<(), ImageError> {
    let mut eroded = Image::from_size_val(src.size(), 0)?;
    erode(src, &mut eroded, kernel)?;
    dilate(&eroded, dst, kernel)?;
    Ok(())
}

/// Isolate the dominant horizontal line structures in an image.
///
/// Applies a morphological opening with a (width/2, 1) rectangular element,
/// which suppresses any horizontal run shorter than half the image width
/// while preserving longer horizontal structures.
///
/// # Example
///
/// ```
/// use gelscan_image::{Image, ImageSize};
/// use gelscan_imgproc::morphology::isolate_horizontal_lines;
///
/// let size = ImageSize { width: 8, height: 4 };
/// let mut img = Image::<u8, 1>::from_size_val(size, 0).unwrap();
/// for x in 0..8 {
///     img.set_pixel(x, 1, 0, 255).unwrap();
/// }
/// let mut lines = Image::<u8, 1>::from_size_val(size, 0).unwrap();
///
/// isolate_horizontal_lines(&img, &mut lines).unwrap();
/// assert_eq!(lines.get_pixel(0, 1, 0).unwrap(), &255);
/// ```
pub fn isolate_horizontal_lines(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
) -> Result<(), ImageError> {
    let kernel = StructuringElement::rect(src.width() / 2, 1);
    open(src, dst, &kernel)
}

/// Isolate the dominant vertical line structures in an image.
///
/// Applies a morphological opening with a (1, height/2) rectangular element,
/// suppressing any vertical run shorter than half the image height.
pub fn isolate_vertical_lines(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
) -> Result<(), ImageError> {
    let kernel = StructuringElement::rect(1, src.height() / 2);
    open(src, dst, &kernel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_rows(width: usize, height: usize, rows: &[(usize, usize, usize)]) -> Image<u8, 1> {
        // rows: (y, x_start, x_end) inclusive spans of foreground
        let mut img = Image::from_size_val(ImageSize { width, height }, 0u8).unwrap();
        for &(y, x0, x1) in rows {
            for x in x0..=x1 {
                img.set_pixel(x, y, 0, 255).unwrap();
            }
        }
        img
    }

    #[test]
    fn test_erode_dilate_roundtrip() -> Result<(), ImageError> {
        let img = image_with_rows(8, 5, &[(2, 0, 7)]);
        let kernel = StructuringElement::rect(4, 1);

        let mut eroded = Image::from_size_val(img.size(), 0)?;
        erode(&img, &mut eroded, &kernel)?;

        // full-width line survives erosion thanks to the max-valued pad
        assert_eq!(eroded.as_slice(), img.as_slice());

        let mut dilated = Image::from_size_val(img.size(), 0)?;
        dilate(&eroded, &mut dilated, &kernel)?;
        assert_eq!(dilated.as_slice(), img.as_slice());

        Ok(())
    }

    #[test]
    fn test_horizontal_lines_preserved_and_filtered() -> Result<(), ImageError> {
        // one full-width line at y=1, one short segment (3 of 12 px) at y=3
        let img = image_with_rows(12, 5, &[(1, 0, 11), (3, 4, 6)]);
        let mut lines = Image::from_size_val(img.size(), 0)?;

        isolate_horizontal_lines(&img, &mut lines)?;

        for x in 0..12 {
            assert_eq!(lines.get_pixel(x, 1, 0)?, &255);
        }
        for x in 0..12 {
            assert_eq!(lines.get_pixel(x, 3, 0)?, &0);
        }

        Ok(())
    }

    #[test]
    fn test_vertical_lines_preserved_and_filtered() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 12,
        };
        let mut img = Image::from_size_val(size, 0u8)?;
        // full-height line at x=2, short vertical segment at x=4
        for y in 0..12 {
            img.set_pixel(2, y, 0, 255)?;
        }
        for y in 5..8 {
            img.set_pixel(4, y, 0, 255)?;
        }

        let mut lines = Image::from_size_val(size, 0)?;
        isolate_vertical_lines(&img, &mut lines)?;

        for y in 0..12 {
            assert_eq!(lines.get_pixel(2, y, 0)?, &255);
            assert_eq!(lines.get_pixel(4, y, 0)?, &0);
        }

        Ok(())
    }

    #[test]
    fn test_open_zero_size() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::new(
            ImageSize {
                width: 0,
                height: 3,
            },
            vec![],
        )?;
        let mut dst = img.clone();

        assert!(open(&img, &mut dst, &StructuringElement::rect(1, 1)).is_err());

        Ok(())
    }
}
