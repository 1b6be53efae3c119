use gelscan_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

use crate::draw::draw_line;

/// Compute the pixel intensity histogram of an image.
///
/// NOTE: this is limited to 8-bit 1-channel images.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
/// * `hist` - The output histogram, accumulated into.
/// * `num_bins` - The number of bins to use for the histogram.
///
/// # Errors
///
/// Returns an error if the number of bins is invalid.
///
/// # Example
///
/// ```
/// use gelscan_image::{Image, ImageSize};
/// use gelscan_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let mut histogram = vec![0; 3];
///
/// compute_histogram(&image, &mut histogram, 3).unwrap();
/// assert_eq!(histogram, vec![3, 3, 3]);
/// ```
pub fn compute_histogram(
    src: &Image<u8, 1>,
    hist: &mut [usize],
    num_bins: usize,
) -> Result<(), ImageError> {
    if num_bins == 0 || num_bins > 256 {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    if hist.len() != num_bins {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    let mut bin_lut = [0usize; 256];
    for (i, bin) in bin_lut.iter_mut().enumerate() {
        *bin = (i * num_bins) >> 8;
    }

    let counts = src
        .as_slice()
        .par_chunks(4096)
        .fold(
            || vec![0usize; num_bins],
            |mut local, chunk| {
                for &px in chunk {
                    local[bin_lut[px as usize]] += 1;
                }
                local
            },
        )
        .reduce(
            || vec![0usize; num_bins],
            |mut a, b| {
                for (i, val) in b.iter().enumerate() {
                    a[i] += val;
                }
                a
            },
        );

    for (out, count) in hist.iter_mut().zip(counts.iter()) {
        *out += count;
    }

    Ok(())
}

/// How a histogram is rendered into an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramStyle {
    /// A connected polyline across a 1024x800 canvas, one segment between
    /// consecutive bin heights, counts min-max normalized into the canvas
    /// height.
    Polyline,
    /// One vertical bar per bin into a 256x256 canvas, bar heights
    /// proportional to `count * canvas_height / max_count`.
    Bars,
}

const POLYLINE_CANVAS: ImageSize = ImageSize {
    width: 1024,
    height: 800,
};

const BARS_CANVAS: ImageSize = ImageSize {
    width: 256,
    height: 256,
};

/// Render a histogram into a plotted grayscale image.
///
/// A degenerate histogram (all counts equal, or empty) renders as a blank
/// canvas instead of dividing by zero.
///
/// # Arguments
///
/// * `hist` - The histogram bins to render.
/// * `style` - The rendering strategy ([`HistogramStyle`]).
///
/// # Errors
///
/// Returns an error if `hist` does not hold between 1 and 256 bins.
pub fn render_histogram(
    hist: &[usize],
    style: HistogramStyle,
) -> Result<Image<u8, 1>, ImageError> {
    if hist.is_empty() || hist.len() > 256 {
        return Err(ImageError::InvalidHistogramBins(hist.len()));
    }

    match style {
        HistogramStyle::Polyline => render_polyline(hist),
        HistogramStyle::Bars => render_bars(hist),
    }
}

fn render_polyline(hist: &[usize]) -> Result<Image<u8, 1>, ImageError> {
    let mut canvas = Image::from_size_val(POLYLINE_CANVAS, 0u8)?;

    let min = hist.iter().copied().min().unwrap_or(0);
    let max = hist.iter().copied().max().unwrap_or(0);
    if max == min {
        // flat distribution: nothing to plot
        return Ok(canvas);
    }

    let height = POLYLINE_CANVAS.height as f64;
    let bin_w = (POLYLINE_CANVAS.width / hist.len()) as i64;

    // min-max normalize counts into the canvas height
    let scaled: Vec<i64> = hist
        .iter()
        .map(|&v| ((v - min) as f64 * height / (max - min) as f64).round() as i64)
        .collect();

    for i in 1..scaled.len() {
        let y0 = POLYLINE_CANVAS.height as i64 - scaled[i - 1];
        let y1 = POLYLINE_CANVAS.height as i64 - scaled[i];
        draw_line(
            &mut canvas,
            (bin_w * (i as i64 - 1), y0),
            (bin_w * i as i64, y1),
            [255],
            1,
        );
    }

    Ok(canvas)
}

fn render_bars(hist: &[usize]) -> Result<Image<u8, 1>, ImageError> {
    let mut canvas = Image::from_size_val(BARS_CANVAS, 0u8)?;

    let max = hist.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Ok(canvas);
    }

    let canvas_height = BARS_CANVAS.height;
    for (bin, &count) in hist.iter().enumerate() {
        let bar_height = (count * canvas_height / max) as i64;
        draw_line(
            &mut canvas,
            (bin as i64, canvas_height as i64 - bar_height),
            (bin as i64, canvas_height as i64),
            [255],
            1,
        );
    }

    Ok(canvas)
}
