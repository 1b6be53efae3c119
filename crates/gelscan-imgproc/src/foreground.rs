use gelscan_image::{Image, ImageError, ImageSize};
use rayon::prelude::*;

use crate::core::apply_mask;

/// Parameters of the adaptive mixture-of-Gaussians background model.
#[derive(Debug, Clone, Copy)]
pub struct BackgroundConfig {
    /// Maximum number of Gaussian modes tracked per pixel.
    pub num_gaussians: usize,
    /// Squared-distance threshold (in variance multiples) for a pixel to
    /// match an existing mode.
    pub var_threshold: f32,
    /// Lower bound on the per-frame learning rate. While fewer than
    /// `1 / learning_rate` frames have been seen, the effective rate is
    /// `1 / (frames_seen + 1)` instead.
    pub learning_rate: f32,
    /// Variance assigned to a freshly created mode.
    pub initial_variance: f32,
    /// Cumulative weight fraction of the sorted modes considered background.
    pub background_ratio: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            num_gaussians: 5,
            var_threshold: 16.0,
            learning_rate: 1.0 / 500.0,
            initial_variance: 225.0,
            background_ratio: 0.9,
        }
    }
}

/// A single Gaussian mode of a per-pixel mixture.
#[derive(Debug, Clone, Copy, Default)]
struct Gaussian {
    weight: f32,
    mean: f32,
    variance: f32,
}

/// A stateful per-pixel mixture-of-Gaussians background model.
///
/// Feed frames in order through [`BackgroundModel::apply`]; each call
/// classifies the frame against the model learned from the frames before it
/// and then folds the frame into the model. The first frame therefore always
/// classifies as foreground everywhere, since no background has been learned
/// yet.
pub struct BackgroundModel {
    size: ImageSize,
    config: BackgroundConfig,
    /// Flattened per-pixel modes, `num_gaussians` entries per pixel, kept
    /// sorted by descending weight.
    modes: Vec<Gaussian>,
    /// Number of live modes per pixel.
    num_modes: Vec<u8>,
    frames_seen: usize,
}

impl BackgroundModel {
    /// Create an empty background model for frames of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-sized frame size or a configuration
    /// without any mixture mode.
    pub fn new(size: ImageSize, config: BackgroundConfig) -> Result<Self, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::ZeroSizeImage(size.width, size.height));
        }

        if config.num_gaussians == 0 {
            return Err(ImageError::InvalidMixtureModes(config.num_gaussians));
        }

        let num_pixels = size.width * size.height;

        Ok(Self {
            size,
            config,
            modes: vec![Gaussian::default(); num_pixels * config.num_gaussians],
            num_modes: vec![0; num_pixels],
            frames_seen: 0,
        })
    }

    /// Size of the frames this model accepts.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Number of frames folded into the model so far.
    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Classify a frame against the learned background and update the model.
    ///
    /// The output mask holds 255 for foreground pixels and 0 for background.
    /// Classification uses the model state from before this call, so feeding
    /// the same frame twice yields an all-background mask on the second call.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame or mask size differs from the model size.
    pub fn apply(
        &mut self,
        frame: &Image<u8, 1>,
        mask: &mut Image<u8, 1>,
    ) -> Result<(), ImageError> {
        if frame.size() != self.size {
            return Err(ImageError::InvalidImageSize(
                self.size.width,
                self.size.height,
                frame.width(),
                frame.height(),
            ));
        }

        if mask.size() != self.size {
            return Err(ImageError::InvalidImageSize(
                self.size.width,
                self.size.height,
                mask.width(),
                mask.height(),
            ));
        }

        // ramp the learning rate down as history accumulates
        let alpha = self
            .config
            .learning_rate
            .max(1.0 / (self.frames_seen as f32 + 1.0));
        let config = self.config;
        let k = config.num_gaussians;

        mask.as_slice_mut()
            .par_iter_mut()
            .zip(frame.as_slice().par_iter())
            .zip(self.modes.par_chunks_exact_mut(k))
            .zip(self.num_modes.par_iter_mut())
            .for_each(|(((out, &px), modes), num_modes)| {
                let value = px as f32;
                let is_background =
                    classify_pixel(value, modes, *num_modes as usize, &config);
                update_pixel(value, modes, num_modes, alpha, &config);
                *out = if is_background { 0 } else { 255 };
            });

        self.frames_seen += 1;

        Ok(())
    }
}

/// Check the pixel value against the modes learned so far. A pixel is
/// background when it matches a mode that lies within the cumulative
/// `background_ratio` weight fraction.
fn classify_pixel(
    value: f32,
    modes: &[Gaussian],
    num_modes: usize,
    config: &BackgroundConfig,
) -> bool {
    let total_weight: f32 = modes[..num_modes].iter().map(|m| m.weight).sum();
    if total_weight <= 0.0 {
        return false;
    }

    let mut cumulative = 0.0;
    for mode in &modes[..num_modes] {
        let diff = value - mode.mean;
        if diff * diff < config.var_threshold * mode.variance {
            // modes beyond the ratio are transient and count as foreground
            return cumulative / total_weight < config.background_ratio;
        }
        cumulative += mode.weight;
    }

    false
}

/// Fold the pixel value into the mixture: decay all weights, reinforce the
/// closest matching mode or spawn a new one, and keep the modes sorted by
/// descending weight.
fn update_pixel(
    value: f32,
    modes: &mut [Gaussian],
    num_modes: &mut u8,
    alpha: f32,
    config: &BackgroundConfig,
) {
    let live = *num_modes as usize;
    let mut matched = None;

    for (i, mode) in modes[..live].iter_mut().enumerate() {
        mode.weight *= 1.0 - alpha;
        if matched.is_none() {
            let diff = value - mode.mean;
            if diff * diff < config.var_threshold * mode.variance {
                matched = Some(i);
                mode.weight += alpha;
                let rho = alpha / mode.weight.max(alpha);
                mode.mean += rho * diff;
                mode.variance += rho * (diff * diff - mode.variance);
            }
        }
    }

    let matched = match matched {
        Some(i) => i,
        None => {
            // replace the weakest mode, or grow the mixture if there is room
            let slot = if live < modes.len() {
                *num_modes += 1;
                live
            } else {
                live - 1
            };
            modes[slot] = Gaussian {
                weight: alpha,
                mean: value,
                variance: config.initial_variance,
            };
            slot
        }
    };

    // bubble the reinforced mode up to keep descending weight order
    let mut i = matched;
    while i > 0 && modes[i].weight > modes[i - 1].weight {
        modes.swap(i, i - 1);
        i -= 1;
    }
}

/// Extract the moving foreground of an ordered frame sequence.
///
/// Each frame is classified against a [`BackgroundModel`] built from the
/// frames before it, and the frame pixels under the foreground mask are
/// copied into the output (background pixels become 0). The first
/// `warmup_frames` outputs are discarded, since the model has not seen
/// enough history for them to be meaningful.
///
/// # Arguments
///
/// * `frames` - The ordered input sequence.
/// * `config` - The background model parameters.
/// * `warmup_frames` - Number of leading outputs to discard.
///
/// # Returns
///
/// One masked image per non-discarded frame; an empty input yields an empty
/// output.
///
/// # Errors
///
/// Returns an error if any frame has a zero-sized dimension or a size
/// differing from the first frame.
pub fn extract_foreground(
    frames: &[Image<u8, 1>],
    config: BackgroundConfig,
    warmup_frames: usize,
) -> Result<Vec<Image<u8, 1>>, ImageError> {
    let Some(first) = frames.first() else {
        return Ok(Vec::new());
    };

    let mut model = BackgroundModel::new(first.size(), config)?;
    let mut outputs = Vec::with_capacity(frames.len().saturating_sub(warmup_frames));
    let mut mask = Image::from_size_val(first.size(), 0u8)?;

    for (index, frame) in frames.iter().enumerate() {
        model.apply(frame, &mut mask)?;

        if index < warmup_frames {
            continue;
        }

        let foreground_pixels = mask.as_slice().iter().filter(|&&m| m != 0).count();
        log::debug!(
            "frame {index}: {foreground_pixels} foreground pixels of {}",
            first.width() * first.height()
        );

        let mut masked = Image::from_size_val(frame.size(), 0u8)?;
        apply_mask(frame, &mut masked, &mask)?;
        outputs.push(masked);
    }

    Ok(outputs)
}

/// Extract the foreground of only the final frame of a sequence.
///
/// The whole sequence is folded into the background model, but only the last
/// frame's masked image is returned. No warm-up discard applies; a
/// single-frame sequence returns that frame masked against an empty model,
/// which marks every pixel foreground.
///
/// # Errors
///
/// Returns an error if any frame has a zero-sized dimension or a size
/// differing from the first frame.
pub fn extract_last_foreground(
    frames: &[Image<u8, 1>],
    config: BackgroundConfig,
) -> Result<Option<Image<u8, 1>>, ImageError> {
    let Some(first) = frames.first() else {
        return Ok(None);
    };

    let mut model = BackgroundModel::new(first.size(), config)?;
    let mut mask = Image::from_size_val(first.size(), 0u8)?;

    for frame in frames {
        model.apply(frame, &mut mask)?;
    }

    // frames is non-empty here
    let last = &frames[frames.len() - 1];
    let mut masked = Image::from_size_val(last.size(), 0u8)?;
    apply_mask(last, &mut masked, &mask)?;

    Ok(Some(masked))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_frame(value: u8) -> Image<u8, 1> {
        Image::from_size_val(
            ImageSize {
                width: 8,
                height: 6,
            },
            value,
        )
        .unwrap()
    }

    #[test]
    fn test_extract_foreground_empty_sequence() -> Result<(), ImageError> {
        let outputs = extract_foreground(&[], BackgroundConfig::default(), 1)?;
        assert!(outputs.is_empty());

        Ok(())
    }

    #[test]
    fn test_extract_foreground_single_frame_discarded() -> Result<(), ImageError> {
        let frames = vec![flat_frame(100)];
        let outputs = extract_foreground(&frames, BackgroundConfig::default(), 1)?;
        assert!(outputs.is_empty());

        Ok(())
    }

    #[test]
    fn test_static_sequence_is_all_background() -> Result<(), ImageError> {
        let frames = vec![flat_frame(100); 5];
        let outputs = extract_foreground(&frames, BackgroundConfig::default(), 1)?;

        // every retained output of an unchanging scene is empty
        assert_eq!(outputs.len(), 4);
        for output in &outputs {
            assert!(output.as_slice().iter().all(|&p| p == 0));
        }

        Ok(())
    }

    #[test]
    fn test_first_frame_is_all_foreground() -> Result<(), ImageError> {
        let frames = vec![flat_frame(100); 3];
        let outputs = extract_foreground(&frames, BackgroundConfig::default(), 0)?;

        assert_eq!(outputs.len(), 3);
        // nothing learned yet, so the whole first frame passes through
        assert!(outputs[0].as_slice().iter().all(|&p| p == 100));
        assert!(outputs[1].as_slice().iter().all(|&p| p == 0));

        Ok(())
    }

    #[test]
    fn test_appearing_object_detected() -> Result<(), ImageError> {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut frames = vec![flat_frame(50); 10];

        // a bright square appears in the last frame
        let last = frames.last_mut().unwrap();
        for y in 1..4 {
            for x in 2..6 {
                last.set_pixel(x, y, 0, 250)?;
            }
        }

        let outputs = extract_foreground(&frames, BackgroundConfig::default(), 1)?;
        let detected = outputs.last().unwrap();

        for y in 1..4 {
            for x in 2..6 {
                assert_eq!(detected.get_pixel(x, y, 0)?, &250);
            }
        }
        // the static surround stays background
        assert_eq!(detected.get_pixel(0, 0, 0)?, &0);
        assert_eq!(detected.get_pixel(7, 5, 0)?, &0);

        Ok(())
    }

    #[test]
    fn test_extract_last_foreground() -> Result<(), ImageError> {
        let mut frames = vec![flat_frame(50); 6];
        frames.last_mut().unwrap().set_pixel(3, 3, 0, 240)?;

        let masked = extract_last_foreground(&frames, BackgroundConfig::default())?.unwrap();

        assert_eq!(masked.get_pixel(3, 3, 0)?, &240);
        assert_eq!(masked.get_pixel(0, 0, 0)?, &0);

        Ok(())
    }

    #[test]
    fn test_extract_last_foreground_empty() -> Result<(), ImageError> {
        assert!(extract_last_foreground(&[], BackgroundConfig::default())?.is_none());

        Ok(())
    }

    #[test]
    fn test_model_rejects_mismatched_frame() -> Result<(), ImageError> {
        let mut model = BackgroundModel::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            BackgroundConfig::default(),
        )?;
        let frame = flat_frame(10);
        let mut mask = Image::from_size_val(frame.size(), 0u8)?;

        assert!(model.apply(&frame, &mut mask).is_err());

        Ok(())
    }

    #[test]
    fn test_zero_mixture_modes_rejected() {
        let config = BackgroundConfig {
            num_gaussians: 0,
            ..Default::default()
        };

        assert!(BackgroundModel::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            config,
        )
        .is_err());
        assert!(extract_foreground(&[flat_frame(10)], config, 0).is_err());
    }

    #[test]
    fn test_model_zero_size() {
        assert!(BackgroundModel::new(
            ImageSize {
                width: 0,
                height: 3,
            },
            BackgroundConfig::default(),
        )
        .is_err());
    }

    #[test]
    fn test_extract_foreground_deterministic() -> Result<(), ImageError> {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let size = ImageSize {
            width: 8,
            height: 8,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let frames: Vec<Image<u8, 1>> = (0..4)
            .map(|_| {
                let data = (0..size.width * size.height).map(|_| rng.random()).collect();
                Image::new(size, data)
            })
            .collect::<Result<_, _>>()?;

        let a = extract_foreground(&frames, BackgroundConfig::default(), 1)?;
        let b = extract_foreground(&frames, BackgroundConfig::default(), 1)?;

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.as_slice(), y.as_slice());
        }

        Ok(())
    }
}
