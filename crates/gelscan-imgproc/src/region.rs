use gelscan_image::{Image, ImageError};

use crate::color::rgb_from_gray_u8;
use crate::draw::draw_rect;

/// A rectangular region given by its top-left corner and extent, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// X-coordinate of the top-left corner.
    pub x: usize,
    /// Y-coordinate of the top-left corner.
    pub y: usize,
    /// Width of the region.
    pub width: usize,
    /// Height of the region.
    pub height: usize,
}

/// Scan outward from the image center along the four cardinal half-lines and
/// return the rectangle spanned by the first non-background pixel hit in each
/// direction.
///
/// A pixel is non-background when its value is non-zero. Directions where the
/// scan reaches the frame edge without a hit keep their default bound: 0 for
/// up and left, the image height/width for down and right. The center pixel
/// itself is inclusive in every direction.
///
/// # Returns
///
/// `Ok(None)` when all four scans miss; since only the center row and column
/// are inspected, this also covers images whose foreground lies entirely off
/// the center cross (use [`content_bounds`] to locate such content).
/// Otherwise `Ok(Some(rect))`.
///
/// # Errors
///
/// Returns an error for a zero-sized image.
///
/// # Example
///
/// ```
/// use gelscan_image::{Image, ImageSize};
/// use gelscan_imgproc::region::innermost_rect;
///
/// let mut img = Image::<u8, 1>::from_size_val(
///     ImageSize { width: 9, height: 9 }, 0,
/// ).unwrap();
/// // frame of foreground around the center
/// for i in 0..9 {
///     img.set_pixel(i, 0, 0, 255).unwrap();
///     img.set_pixel(i, 8, 0, 255).unwrap();
///     img.set_pixel(0, i, 0, 255).unwrap();
///     img.set_pixel(8, i, 0, 255).unwrap();
/// }
///
/// let rect = innermost_rect(&img).unwrap().unwrap();
/// assert_eq!((rect.x, rect.y, rect.width, rect.height), (0, 0, 8, 8));
/// ```
pub fn innermost_rect(src: &Image<u8, 1>) -> Result<Option<Rect>, ImageError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::ZeroSizeImage(src.width(), src.height()));
    }

    let width = src.width();
    let height = src.height();
    let cx = width / 2;
    let cy = height / 2;
    let data = src.as_slice();

    let mut up = 0;
    let mut down = height;
    let mut left = 0;
    let mut right = width;
    let mut found_any = false;

    // nearest non-background pixel above the center (inclusive)
    for y in (0..=cy).rev() {
        if data[y * width + cx] != 0 {
            up = y;
            found_any = true;
            break;
        }
    }

    // nearest non-background pixel below the center (inclusive)
    for y in cy..height {
        if data[y * width + cx] != 0 {
            down = y;
            found_any = true;
            break;
        }
    }

    // nearest non-background pixel to the left of the center (inclusive)
    for x in (0..=cx).rev() {
        if data[cy * width + x] != 0 {
            left = x;
            found_any = true;
            break;
        }
    }

    // nearest non-background pixel to the right of the center (inclusive)
    for x in cx..width {
        if data[cy * width + x] != 0 {
            right = x;
            found_any = true;
            break;
        }
    }

    if !found_any {
        return Ok(None);
    }

    Ok(Some(Rect {
        x: left,
        y: up,
        width: right - left,
        height: down - up,
    }))
}

/// Compute the bounding box of all non-background content in the image.
///
/// Performs a full raster scan tracking the minimal and maximal x and y among
/// all non-zero pixels. The extents are inclusive spans: a single foreground
/// pixel yields a rectangle of zero width and height at that pixel.
///
/// # Returns
///
/// `Ok(None)` when the image contains no non-background pixel; otherwise
/// `Ok(Some(rect))`.
///
/// # Errors
///
/// Returns an error for a zero-sized image.
///
/// # Example
///
/// ```
/// use gelscan_image::{Image, ImageSize};
/// use gelscan_imgproc::region::content_bounds;
///
/// let mut img = Image::<u8, 1>::from_size_val(
///     ImageSize { width: 10, height: 10 }, 0,
/// ).unwrap();
/// img.set_pixel(3, 4, 0, 200).unwrap();
/// img.set_pixel(7, 6, 0, 200).unwrap();
///
/// let rect = content_bounds(&img).unwrap().unwrap();
/// assert_eq!((rect.x, rect.y, rect.width, rect.height), (3, 4, 4, 2));
/// ```
pub fn content_bounds(src: &Image<u8, 1>) -> Result<Option<Rect>, ImageError> {
    if src.width() == 0 || src.height() == 0 {
        return Err(ImageError::ZeroSizeImage(src.width(), src.height()));
    }

    let width = src.width();

    let mut left_most = usize::MAX;
    let mut right_most = 0;
    let mut top_most = usize::MAX;
    let mut bottom_most = 0;
    let mut found_any = false;

    for (i, &value) in src.as_slice().iter().enumerate() {
        if value != 0 {
            let x = i % width;
            let y = i / width;
            left_most = left_most.min(x);
            right_most = right_most.max(x);
            top_most = top_most.min(y);
            bottom_most = bottom_most.max(y);
            found_any = true;
        }
    }

    if !found_any {
        return Ok(None);
    }

    Ok(Some(Rect {
        x: left_most,
        y: top_most,
        width: right_most - left_most,
        height: bottom_most - top_most,
    }))
}

/// Render a grayscale image as RGB with a red rectangle outline drawn over
/// the given region.
///
/// # Arguments
///
/// * `src` - The grayscale image to render.
/// * `rect` - The region to outline.
/// * `thickness` - The outline thickness in pixels.
pub fn draw_rect_overlay(
    src: &Image<u8, 1>,
    rect: Rect,
    thickness: usize,
) -> Result<Image<u8, 3>, ImageError> {
    let mut rgb = Image::from_size_val(src.size(), 0)?;
    rgb_from_gray_u8(src, &mut rgb)?;

    draw_rect(
        &mut rgb,
        (rect.x as i64, rect.y as i64),
        ((rect.x + rect.width) as i64, (rect.y + rect.height) as i64),
        [255, 0, 0],
        thickness,
    );

    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gelscan_image::ImageSize;

    #[test]
    fn test_content_bounds_all_background() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 8,
                height: 6,
            },
            0,
        )?;

        assert_eq!(content_bounds(&img)?, None);

        Ok(())
    }

    #[test]
    fn test_content_bounds_single_pixel() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 8,
                height: 6,
            },
            0,
        )?;
        img.set_pixel(5, 2, 0, 1)?;

        let rect = content_bounds(&img)?.unwrap();
        assert_eq!(
            rect,
            Rect {
                x: 5,
                y: 2,
                width: 0,
                height: 0
            }
        );

        Ok(())
    }

    #[test]
    fn test_content_bounds_spanning_region() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 10,
                height: 10,
            },
            0,
        )?;
        img.set_pixel(2, 3, 0, 128)?;
        img.set_pixel(8, 7, 0, 64)?;
        img.set_pixel(4, 5, 0, 32)?;

        let rect = content_bounds(&img)?.unwrap();
        assert_eq!(
            rect,
            Rect {
                x: 2,
                y: 3,
                width: 6,
                height: 4
            }
        );

        Ok(())
    }

    #[test]
    fn test_innermost_rect_all_foreground() -> Result<(), ImageError> {
        // every scan stops at the center pixel immediately
        let img = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 9,
                height: 7,
            },
            255,
        )?;

        let rect = innermost_rect(&img)?.unwrap();
        assert_eq!(
            rect,
            Rect {
                x: 4,
                y: 3,
                width: 0,
                height: 0
            }
        );

        Ok(())
    }

    #[test]
    fn test_innermost_rect_all_background() -> Result<(), ImageError> {
        let img = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 9,
                height: 7,
            },
            0,
        )?;

        assert_eq!(innermost_rect(&img)?, None);

        Ok(())
    }

    #[test]
    fn test_innermost_rect_off_center_cross() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 9,
                height: 9,
            },
            0,
        )?;
        // foreground away from the center row and column is invisible to the
        // cardinal scans but still found by the raster locator
        img.set_pixel(1, 1, 0, 255)?;

        assert_eq!(innermost_rect(&img)?, None);
        assert_eq!(
            content_bounds(&img)?,
            Some(Rect {
                x: 1,
                y: 1,
                width: 0,
                height: 0
            })
        );

        Ok(())
    }

    #[test]
    fn test_innermost_rect_frame() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 9,
            height: 9,
        };
        let mut img = Image::<u8, 1>::from_size_val(size, 0)?;
        for i in 0..9 {
            img.set_pixel(i, 0, 0, 255)?;
            img.set_pixel(i, 8, 0, 255)?;
            img.set_pixel(0, i, 0, 255)?;
            img.set_pixel(8, i, 0, 255)?;
        }

        let rect = innermost_rect(&img)?.unwrap();
        assert_eq!(
            rect,
            Rect {
                x: 0,
                y: 0,
                width: 8,
                height: 8
            }
        );

        Ok(())
    }

    #[test]
    fn test_innermost_rect_partial_hits() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 11,
            height: 11,
        };
        let mut img = Image::<u8, 1>::from_size_val(size, 0)?;
        // only a pixel above and one to the right of the center column/row
        img.set_pixel(5, 2, 0, 255)?;
        img.set_pixel(8, 5, 0, 255)?;

        let rect = innermost_rect(&img)?.unwrap();
        // down and left keep their default bounds (height and 0)
        assert_eq!(
            rect,
            Rect {
                x: 0,
                y: 2,
                width: 8,
                height: 9
            }
        );

        Ok(())
    }

    #[test]
    fn test_draw_rect_overlay() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 8,
                height: 8,
            },
            10,
        )?;
        img.set_pixel(4, 4, 0, 200)?;

        let rect = Rect {
            x: 2,
            y: 2,
            width: 4,
            height: 4,
        };
        let overlay = draw_rect_overlay(&img, rect, 1)?;

        assert_eq!(overlay.num_channels(), 3);
        // corner of the outline is pure red
        assert_eq!(overlay.get_pixel(2, 2, 0)?, &255);
        assert_eq!(overlay.get_pixel(2, 2, 1)?, &0);
        assert_eq!(overlay.get_pixel(2, 2, 2)?, &0);
        // untouched pixel keeps the replicated gray value
        assert_eq!(overlay.get_pixel(0, 0, 0)?, &10);
        assert_eq!(overlay.get_pixel(0, 0, 1)?, &10);

        Ok(())
    }
}
