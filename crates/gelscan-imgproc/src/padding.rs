use gelscan_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

/// A border type for the spatial padding.
#[derive(Debug, Clone, Copy)]
pub enum PaddingMode {
    /// Fills the border with a single, constant value.
    ///
    /// Example: ...d c b a | 0 0 0 0...
    Constant,

    /// Repeats the outermost row or column of pixels into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// Reflects the pixel values at the boundary, starting with the pixel next to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,
}

impl PaddingMode {
    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index within `[0, len)` according to the padding mode.
    ///
    /// - `Replicate`: clamp to edge
    /// - `Reflect101`: mirror excluding edge
    /// - `Constant`: returns 0 (not used directly)
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        match self {
            PaddingMode::Replicate => i.clamp(0, len as isize - 1) as usize,
            PaddingMode::Reflect101 => Self::reflect101(i, len),
            PaddingMode::Constant => 0,
        }
    }
}

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// Create a padding with the same extent on all four sides.
    pub fn all(pad: usize) -> Self {
        Self {
            top: pad,
            bottom: pad,
            left: pad,
            right: pad,
        }
    }

    /// Validates that `new_size` matches `old_size` grown by this padding.
    pub fn validate_size(&self, old_size: ImageSize, new_size: ImageSize) -> bool {
        new_size.width == old_size.width + self.left + self.right
            && new_size.height == old_size.height + self.top + self.bottom
    }
}

/// Creates a padded copy of `src` in `dst` with the given border handling.
///
/// # Arguments
///
/// * `src` - The source image to pad.
/// * `dst` - The destination image, sized `src` plus the padding extents.
/// * `padding` - The amount of padding for all four sides.
/// * `padding_mode` - The border handling mode ([`PaddingMode`]).
/// * `constant_value` - The pixel value used for constant padding.
///
/// # Errors
///
/// Returns an error if the size of `dst` does not match the expected padded size.
///
/// # Example
///
/// ```
/// use gelscan_image::{Image, ImageSize};
/// use gelscan_imgproc::padding::{spatial_padding, Padding2D, PaddingMode};
///
/// let src = Image::<u8, 1>::new(
///     ImageSize { width: 2, height: 2 },
///     vec![1u8; 4],
/// ).unwrap();
///
/// let mut dst = Image::<u8, 1>::from_size_val(
///     ImageSize { width: 4, height: 4 },
///     0u8,
/// ).unwrap();
///
/// spatial_padding(&src, &mut dst, Padding2D::all(1), PaddingMode::Constant, [0u8]).unwrap();
///
/// assert_eq!(dst.get_pixel(0, 0, 0).unwrap(), &0u8);
/// assert_eq!(dst.get_pixel(1, 1, 0).unwrap(), &1u8);
/// ```
pub fn spatial_padding<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    padding: Padding2D,
    padding_mode: PaddingMode,
    constant_value: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if !padding.validate_size(src.size(), dst.size()) {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width() + padding.left + padding.right,
            src.height() + padding.top + padding.bottom,
        ));
    }

    let old_width = src.width();
    let old_height = src.height();
    let new_width = dst.width();

    let old_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(new_width * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let sy = y as isize - padding.top as isize;
            let inside_y = sy >= 0 && (sy as usize) < old_height;

            for (x, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
                let sx = x as isize - padding.left as isize;
                let inside_x = sx >= 0 && (sx as usize) < old_width;

                if inside_y && inside_x {
                    let offset = (sy as usize * old_width + sx as usize) * C;
                    dst_pixel.copy_from_slice(&old_data[offset..offset + C]);
                } else if let PaddingMode::Constant = padding_mode {
                    dst_pixel.copy_from_slice(&constant_value);
                } else {
                    let my = padding_mode.map_index(sy, old_height);
                    let mx = padding_mode.map_index(sx, old_width);
                    let offset = (my * old_width + mx) * C;
                    dst_pixel.copy_from_slice(&old_data[offset..offset + C]);
                }
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_padding() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1, 2, 3, 4],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            9,
        )?;

        spatial_padding(&src, &mut dst, Padding2D::all(1), PaddingMode::Constant, [0])?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                0, 0, 0, 0,
                0, 1, 2, 0,
                0, 3, 4, 0,
                0, 0, 0, 0,
            ],
        );

        Ok(())
    }

    #[test]
    fn test_replicate_padding() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![1, 2],
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 3,
            },
            0,
        )?;

        spatial_padding(
            &src,
            &mut dst,
            Padding2D::all(1),
            PaddingMode::Replicate,
            [0],
        )?;

        #[rustfmt::skip]
        assert_eq!(
            dst.as_slice(),
            &[
                1, 1, 2, 2,
                1, 1, 2, 2,
                1, 1, 2, 2,
            ],
        );

        Ok(())
    }

    #[test]
    fn test_padding_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;
        let mut dst = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            0,
        )?;

        let res = spatial_padding(&src, &mut dst, Padding2D::all(1), PaddingMode::Constant, [0]);
        assert!(res.is_err());

        Ok(())
    }

    #[test]
    fn test_reflect101_map_index() {
        let mode = PaddingMode::Reflect101;
        assert_eq!(mode.map_index(-1, 4), 1);
        assert_eq!(mode.map_index(-2, 4), 2);
        assert_eq!(mode.map_index(4, 4), 2);
        assert_eq!(mode.map_index(5, 4), 1);
        assert_eq!(mode.map_index(2, 4), 2);
    }
}
