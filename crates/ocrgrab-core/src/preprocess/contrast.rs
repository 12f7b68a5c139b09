use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::error::PreprocessError;
use crate::raster::RasterImage;

/// Scale every channel's distance from the mean luminance by `factor`.
///
/// A factor of 1 returns the input, above 1 increases contrast. Colour is
/// preserved.
pub fn enhance(image: &RasterImage, factor: f32) -> Result<RasterImage, PreprocessError> {
    if !(factor > 0.0) {
        return Err(PreprocessError::InvalidParameter {
            name: "contrast factor",
            reason: format!("{factor} is not positive"),
        });
    }
    if image.is_empty() {
        return Err(PreprocessError::EmptyImage);
    }

    let mean = mean_luma(&image.to_luma());
    let stretch = |v: u8| -> u8 { (mean + factor * (f32::from(v) - mean)).round().clamp(0.0, 255.0) as u8 };

    Ok(match image {
        RasterImage::Rgb(img) => RasterImage::Rgb(RgbImage::from_fn(img.width(), img.height(), |x, y| {
            let Rgb([r, g, b]) = *img.get_pixel(x, y);
            Rgb([stretch(r), stretch(g), stretch(b)])
        })),
        RasterImage::Gray(img) => RasterImage::Gray(GrayImage::from_fn(img.width(), img.height(), |x, y| {
            Luma([stretch(img.get_pixel(x, y)[0])])
        })),
    })
}

/// Mean intensity rounded to a whole grey level
fn mean_luma(gray: &GrayImage) -> f32 {
    let total: u64 = gray.pixels().map(|p| u64::from(p[0])).sum();
    let count = u64::from(gray.width()) * u64::from(gray.height());
    (total as f64 / count as f64).round() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_page_stays_white() {
        let image = RasterImage::Rgb(RgbImage::from_pixel(30, 20, Rgb([255, 255, 255])));
        let out = enhance(&image, 2.0).unwrap();

        assert_eq!(out, image);
    }

    #[test]
    fn unit_factor_is_identity() {
        let image = RasterImage::Gray(GrayImage::from_fn(9, 9, |x, y| Luma([(x * 20 + y) as u8])));

        assert_eq!(enhance(&image, 1.0).unwrap(), image);
    }

    #[test]
    fn values_spread_around_mean_and_clip() {
        let image = RasterImage::Gray(GrayImage::from_fn(4, 1, |x, _| Luma([[0, 100, 140, 240][x as usize]])));
        let RasterImage::Gray(out) = enhance(&image, 2.0).unwrap() else {
            panic!("gray input must stay gray");
        };

        // mean is 120
        let values: Vec<u8> = out.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![0, 80, 160, 255]);
    }
}
