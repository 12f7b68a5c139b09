//! Non-local means denoising for single-channel images.

use image::{GrayImage, Luma};

use super::odd_window;
use crate::error::PreprocessError;

/// Replace every pixel by a weighted mean of the pixels in its search window,
/// weighted by how similar their surrounding patches are.
///
/// Patch distances are the mean squared difference over a
/// `template × template` patch, and a candidate weighs `exp(-d / h²)`.
/// Borders replicate the edge pixels.
pub fn non_local_means(
    image: &GrayImage,
    h: f32,
    template: u32,
    search: u32,
) -> Result<GrayImage, PreprocessError> {
    if !(h > 0.0) {
        return Err(PreprocessError::InvalidParameter {
            name: "denoise strength",
            reason: format!("{h} is not positive"),
        });
    }
    let tr = odd_window("denoise template window", template)? as usize;
    let sr = odd_window("denoise search window", search)? as usize;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PreprocessError::EmptyImage);
    }
    let (w, hgt) = (width as usize, height as usize);

    let pad = sr + tr;
    let padded = Padded::new(image, pad);

    // Patch sums for every pixel are read from an integral image of squared
    // differences between the padded image and its shifted copy.
    let rw = w + 2 * tr;
    let rh = hgt + 2 * tr;
    let stride = rw + 1;
    let mut integral = vec![0u64; stride * (rh + 1)];

    let patch_area = (2 * tr + 1) as f32;
    let inv = 1.0 / (patch_area * patch_area * h * h);
    let side = 2 * tr + 1;

    let mut weighted = vec![0f32; w * hgt];
    let mut weights = vec![0f32; w * hgt];

    for dy in -(sr as isize)..=sr as isize {
        for dx in -(sr as isize)..=sr as isize {
            for v in 0..rh {
                let mut row_sum = 0u64;
                let py = sr + v;
                let qy = (py as isize + dy) as usize;
                for u in 0..rw {
                    let px = sr + u;
                    let qx = (px as isize + dx) as usize;
                    let d = i32::from(padded.at(px, py)) - i32::from(padded.at(qx, qy));
                    row_sum += (d * d) as u64;
                    integral[(v + 1) * stride + u + 1] = integral[v * stride + u + 1] + row_sum;
                }
            }

            for y in 0..hgt {
                for x in 0..w {
                    let sum = integral[(y + side) * stride + x + side] + integral[y * stride + x]
                        - integral[y * stride + x + side]
                        - integral[(y + side) * stride + x];
                    let weight = (-(sum as f32) * inv).exp();
                    let qx = (x + pad) as isize + dx;
                    let qy = (y + pad) as isize + dy;
                    let value = padded.at(qx as usize, qy as usize);

                    weighted[y * w + x] += weight * f32::from(value);
                    weights[y * w + x] += weight;
                }
            }
        }
    }

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let i = y as usize * w + x as usize;
        Luma([(weighted[i] / weights[i]).round().clamp(0.0, 255.0) as u8])
    }))
}

/// Edge-replicated copy of an image with `pad` extra pixels on each side
struct Padded {
    data: Vec<u8>,
    width: usize,
}

impl Padded {
    fn new(image: &GrayImage, pad: usize) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let width = w + 2 * pad;
        let height = h + 2 * pad;

        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let sy = y.saturating_sub(pad).min(h - 1) as u32;
            for x in 0..width {
                let sx = x.saturating_sub(pad).min(w - 1) as u32;
                data.push(image.get_pixel(sx, sy)[0]);
            }
        }
        Self { data, width }
    }

    fn at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}
