use image::{GrayImage, Luma};
use imageproc::filter::separable_filter_equal;

use super::odd_window;
use crate::error::PreprocessError;

/// Binarize against a Gaussian-weighted local mean.
///
/// A pixel turns white (255) when it is brighter than `mean - offset` of its
/// `block × block` neighbourhood and black (0) otherwise.
pub fn adaptive_gaussian(image: &GrayImage, block: u32, offset: i32) -> Result<GrayImage, PreprocessError> {
    odd_window("threshold block size", block)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(PreprocessError::EmptyImage);
    }

    let kernel = gaussian_kernel(block);
    let mean = separable_filter_equal(image, &kernel);

    Ok(GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let src = i32::from(image.get_pixel(x, y)[0]);
        let local = i32::from(mean.get_pixel(x, y)[0]);
        Luma([if src > local - offset { 255 } else { 0 }])
    }))
}

/// Normalized 1-D Gaussian of `size` taps; sigma follows the usual
/// `0.3 * ((size - 1) / 2 - 1) + 0.8` rule for the window size.
fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let radius = (size / 2) as i32;

    let taps: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i * i) as f32 / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f32 = taps.iter().sum();
    taps.into_iter().map(|t| t / total).collect()
}
