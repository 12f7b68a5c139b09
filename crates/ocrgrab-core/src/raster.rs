use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, GrayImage, ImageEncoder, ImageResult, RgbImage, RgbaImage};

/// Pixels handed from one pipeline stage to the next.
///
/// Stages borrow the image they receive and return a new one, so a capture
/// stays intact after it has been preprocessed.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterImage {
    Rgb(RgbImage),
    Gray(GrayImage),
}

impl RasterImage {
    /// Drops the alpha channel of a screen grab.
    pub fn from_rgba(image: RgbaImage) -> Self {
        RasterImage::Rgb(DynamicImage::ImageRgba8(image).to_rgb8())
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(gray) => RasterImage::Gray(gray),
            other => RasterImage::Rgb(other.to_rgb8()),
        }
    }

    pub fn open(path: &Path) -> ImageResult<Self> {
        Ok(Self::from_dynamic(image::open(path)?))
    }

    pub fn width(&self) -> u32 {
        match self {
            RasterImage::Rgb(img) => img.width(),
            RasterImage::Gray(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            RasterImage::Rgb(img) => img.height(),
            RasterImage::Gray(img) => img.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn channels(&self) -> u8 {
        match self {
            RasterImage::Rgb(_) => 3,
            RasterImage::Gray(_) => 1,
        }
    }

    /// Single-channel copy, weighted as `image` computes luma.
    pub fn to_luma(&self) -> GrayImage {
        match self {
            RasterImage::Rgb(img) => image::imageops::grayscale(img),
            RasterImage::Gray(img) => img.clone(),
        }
    }

    pub fn to_dynamic(&self) -> DynamicImage {
        match self {
            RasterImage::Rgb(img) => DynamicImage::ImageRgb8(img.clone()),
            RasterImage::Gray(img) => DynamicImage::ImageLuma8(img.clone()),
        }
    }

    pub fn encode_png(&self) -> ImageResult<Vec<u8>> {
        let (raw, color_type) = match self {
            RasterImage::Rgb(img) => (img.as_raw(), ExtendedColorType::Rgb8),
            RasterImage::Gray(img) => (img.as_raw(), ExtendedColorType::L8),
        };

        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer).write_image(raw, self.width(), self.height(), color_type)?;
        Ok(buffer)
    }

    pub fn save(&self, path: &Path) -> ImageResult<()> {
        match self {
            RasterImage::Rgb(img) => img.save(path),
            RasterImage::Gray(img) => img.save(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, Rgba};

    #[test]
    fn rgba_capture_loses_alpha_only() {
        let rgba = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 128]));
        let raster = RasterImage::from_rgba(rgba);

        match &raster {
            RasterImage::Rgb(img) => assert_eq!(*img.get_pixel(3, 1), Rgb([10, 20, 30])),
            other => panic!("expected rgb, got {other:?}"),
        }
        assert_eq!(raster.dimensions(), (4, 2));
        assert_eq!(raster.channels(), 3);
    }

    #[test]
    fn png_round_trip_keeps_gray() {
        let gray = GrayImage::from_fn(5, 3, |x, y| Luma([(x * 40 + y) as u8]));
        let raster = RasterImage::Gray(gray);

        let png = raster.encode_png().unwrap();
        let decoded = RasterImage::from_dynamic(image::load_from_memory(&png).unwrap());

        assert_eq!(decoded, raster);
    }
}
