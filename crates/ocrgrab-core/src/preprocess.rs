use image::GrayImage;
use ocrgrab_config::preprocess::PreprocessConfig;
use ocrgrab_types::OcrMode;

use crate::error::PreprocessError;
use crate::raster::RasterImage;

pub mod clahe;
pub mod contrast;
pub mod denoise;
pub mod threshold;

/// Turns a capture into an image the OCR engine reads well.
pub trait Preprocessor {
    /// Never mutates `image`; every mode returns a fresh image.
    fn process(&self, image: &RasterImage, mode: OcrMode) -> Result<RasterImage, PreprocessError>;
}

/// Fixed, deterministic filter chain per mode
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    config: PreprocessConfig,
}

impl FilterChain {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// grayscale -> CLAHE -> non-local means -> adaptive threshold
    pub fn handwriting(&self, image: &RasterImage) -> Result<GrayImage, PreprocessError> {
        let c = &self.config;

        let gray = image.to_luma();
        let equalized = clahe::equalize(&gray, c.clahe_clip_limit, c.clahe_tile_grid)?;
        let denoised = denoise::non_local_means(
            &equalized,
            c.denoise_strength,
            c.denoise_template_window,
            c.denoise_search_window,
        )?;
        threshold::adaptive_gaussian(&denoised, c.threshold_block_size, c.threshold_offset)
    }

    pub fn kannada(&self, image: &RasterImage) -> Result<RasterImage, PreprocessError> {
        contrast::enhance(image, self.config.contrast_factor)
    }
}

impl Preprocessor for FilterChain {
    fn process(&self, image: &RasterImage, mode: OcrMode) -> Result<RasterImage, PreprocessError> {
        if image.is_empty() {
            return Err(PreprocessError::EmptyImage);
        }

        let start = std::time::Instant::now();
        let output = match mode {
            OcrMode::Printed => image.clone(),
            OcrMode::Handwriting => RasterImage::Gray(self.handwriting(image)?),
            OcrMode::Kannada => self.kannada(image)?,
        };

        tracing::debug!(
            "preprocessed {}x{} image for {} in {:?}",
            image.width(),
            image.height(),
            mode,
            start.elapsed()
        );
        Ok(output)
    }
}

pub(crate) fn odd_window(name: &'static str, size: u32) -> Result<u32, PreprocessError> {
    if size < 3 || size % 2 == 0 {
        return Err(PreprocessError::InvalidParameter {
            name,
            reason: format!("window size {size} must be odd and at least 3"),
        });
    }
    Ok(size / 2)
}


#[cfg(test)]
mod tests {
    use super::test_images::{colorful, distinct_levels, uneven_page};
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn printed_is_identity() {
        let input = RasterImage::Rgb(colorful(64, 48));
        let output = FilterChain::default().process(&input, OcrMode::Printed).unwrap();

        assert_eq!(output, input);
    }

    #[test]
    fn handwriting_is_single_channel_binary() {
        let input = RasterImage::Rgb(colorful(64, 48));
        let output = FilterChain::default().process(&input, OcrMode::Handwriting).unwrap();

        let RasterImage::Gray(gray) = &output else {
            panic!("handwriting output must be grayscale");
        };
        assert_eq!(output.channels(), 1);
        assert_eq!(gray.dimensions(), (64, 48));
        assert!(distinct_levels(gray).iter().all(|v| *v == 0 || *v == 255));
    }

    #[test]
    fn every_mode_is_deterministic_and_leaves_input_alone() {
        let chain = FilterChain::default();
        let input = RasterImage::Gray(uneven_page(96, 64));
        let before = input.clone();

        for mode in OcrMode::ALL {
            let first = chain.process(&input, mode).unwrap();
            let second = chain.process(&input, mode).unwrap();
            assert_eq!(first, second, "{mode} is not deterministic");
        }
        assert_eq!(input, before);
    }

    #[test]
    fn handwriting_threshold_adapts_to_both_halves() {
        let (width, height) = (256, 128);
        let page = uneven_page(width, height);
        let output = FilterChain::default()
            .process(&RasterImage::Gray(page), OcrMode::Handwriting)
            .unwrap();
        let RasterImage::Gray(binary) = output else {
            panic!("expected grayscale output");
        };

        // Left paper (90) is darker than right ink (140), so no single global
        // cutoff separates both halves.
        for (x0, x1) in [(8, width / 2 - 32), (width / 2 + 32, width - 8)] {
            let columns: Vec<u32> = (x0..x1).filter(|x| x % 32 > 8 && x % 32 < 24).collect();
            let mut ink = 0;
            let mut paper = 0;
            let mut samples = 0;
            for y in (16..height - 16).step_by(8) {
                for &x in &columns {
                    samples += 1;
                    if binary.get_pixel(x, y + 4)[0] == 0 {
                        ink += 1;
                    }
                    if binary.get_pixel(x, y)[0] == 255 {
                        paper += 1;
                    }
                }
            }
            assert!(ink * 10 >= samples * 9, "ink lost in half {x0}..{x1}: {ink}/{samples}");
            assert!(paper * 10 >= samples * 9, "paper not white in half {x0}..{x1}: {paper}/{samples}");
        }
    }

    #[test]
    fn kannada_keeps_color_and_boosts_contrast() {
        let input = RasterImage::Rgb(RgbImage::from_fn(10, 1, |x, _| {
            let v = 100 + x as u8 * 6;
            Rgb([v, v, v])
        }));
        let output = FilterChain::default().process(&input, OcrMode::Kannada).unwrap();

        let RasterImage::Rgb(out) = output else {
            panic!("kannada output must stay rgb");
        };
        let spread_in = 54;
        let spread_out = i32::from(out.get_pixel(9, 0)[0]) - i32::from(out.get_pixel(0, 0)[0]);
        assert_eq!(spread_out, spread_in * 2);
    }

    #[test]
    fn empty_image_is_rejected() {
        let input = RasterImage::Gray(GrayImage::from_pixel(0, 5, Luma([0])));

        assert!(matches!(
            FilterChain::default().process(&input, OcrMode::Printed),
            Err(PreprocessError::EmptyImage)
        ));
    }
}
