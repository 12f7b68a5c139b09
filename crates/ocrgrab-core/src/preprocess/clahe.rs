//! Contrast limited adaptive histogram equalization.

use image::{GrayImage, Luma};

use crate::error::PreprocessError;

const BINS: usize = 256;

/// Equalize `image` over a `grid × grid` layout of tiles.
///
/// Each tile histogram is clipped at `clip_limit × tile_area / 256` counts
/// and the excess is spread over all bins. Pixels blend the lookup tables of
/// the four nearest tile centres.
pub fn equalize(image: &GrayImage, clip_limit: f32, grid: u32) -> Result<GrayImage, PreprocessError> {
    if !(clip_limit > 0.0) {
        return Err(PreprocessError::InvalidParameter {
            name: "clahe clip limit",
            reason: format!("{clip_limit} is not positive"),
        });
    }
    if grid == 0 {
        return Err(PreprocessError::InvalidParameter {
            name: "clahe tile grid",
            reason: "needs at least one tile".to_string(),
        });
    }

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PreprocessError::EmptyImage);
    }

    let cols = Axis::new(width, grid);
    let rows = Axis::new(height, grid);

    let mut luts = Vec::with_capacity(cols.tiles() * rows.tiles());
    for ty in 0..rows.tiles() {
        for tx in 0..cols.tiles() {
            luts.push(tile_lut(image, cols.span(tx), rows.span(ty), clip_limit));
        }
    }

    let col_weights: Vec<(usize, usize, f32)> = (0..width).map(|x| cols.blend(x)).collect();
    let row_weights: Vec<(usize, usize, f32)> = (0..height).map(|y| rows.blend(y)).collect();
    let lut = |tx: usize, ty: usize| &luts[ty * cols.tiles() + tx];

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let v = image.get_pixel(x, y)[0] as usize;
        let (x0, x1, fx) = col_weights[x as usize];
        let (y0, y1, fy) = row_weights[y as usize];

        let top = lut(x0, y0)[v] * (1.0 - fx) + lut(x1, y0)[v] * fx;
        let bottom = lut(x0, y1)[v] * (1.0 - fx) + lut(x1, y1)[v] * fx;
        let value = top * (1.0 - fy) + bottom * fy;

        Luma([value.round().clamp(0.0, 255.0) as u8])
    }))
}

/// Tile layout along one image axis
struct Axis {
    len: u32,
    tiles: u32,
}

impl Axis {
    fn new(len: u32, grid: u32) -> Self {
        Self {
            len,
            tiles: grid.min(len),
        }
    }

    fn tiles(&self) -> usize {
        self.tiles as usize
    }

    fn start(&self, tile: u32) -> u32 {
        (u64::from(tile) * u64::from(self.len) / u64::from(self.tiles)) as u32
    }

    fn span(&self, tile: usize) -> (u32, u32) {
        let tile = tile as u32;
        (self.start(tile), self.start(tile + 1))
    }

    fn center(&self, tile: u32) -> f32 {
        let (start, end) = self.span(tile as usize);
        (start + end) as f32 / 2.0 - 0.5
    }

    /// Neighbouring tiles around `pos` and the weight of the second one
    fn blend(&self, pos: u32) -> (usize, usize, f32) {
        let p = pos as f32;
        if p <= self.center(0) {
            return (0, 0, 0.0);
        }
        let last = self.tiles - 1;
        if p >= self.center(last) {
            return (last as usize, last as usize, 0.0);
        }

        let mut lo = 0;
        while self.center(lo + 1) < p {
            lo += 1;
        }
        let (c0, c1) = (self.center(lo), self.center(lo + 1));
        (lo as usize, lo as usize + 1, (p - c0) / (c1 - c0))
    }
}

fn tile_lut(image: &GrayImage, (x0, x1): (u32, u32), (y0, y1): (u32, u32), clip_limit: f32) -> [f32; BINS] {
    let mut hist = [0u32; BINS];
    for y in y0..y1 {
        for x in x0..x1 {
            hist[image.get_pixel(x, y)[0] as usize] += 1;
        }
    }

    let area = (x1 - x0) * (y1 - y0);
    let limit = ((clip_limit * area as f32 / BINS as f32) as u32).max(1);

    let mut excess = 0;
    for count in hist.iter_mut() {
        if *count > limit {
            excess += *count - limit;
            *count = limit;
        }
    }

    let batch = excess / BINS as u32;
    let mut residual = excess % BINS as u32;
    for count in hist.iter_mut() {
        *count += batch;
    }
    if residual > 0 {
        let step = (BINS as u32 / residual).max(1) as usize;
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }

    let scale = 255.0 / area as f32;
    let mut lut = [0f32; BINS];
    let mut sum = 0u32;
    for (entry, count) in lut.iter_mut().zip(hist) {
        sum += count;
        *entry = (sum as f32 * scale).round().min(255.0);
    }
    lut
}
