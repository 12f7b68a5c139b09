use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use ocrgrab_config::ui::UiConfig;
use ocrgrab_types::ScreenRect;

/// Look of the full-screen selection overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub dim_alpha: u8,
    pub outline: Rgba<u8>,
    pub outline_width: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            dim_alpha: 100,
            outline: Rgba([255, 0, 0, 255]),
            outline_width: 2,
        }
    }
}

impl From<&UiConfig> for OverlayStyle {
    fn from(ui: &UiConfig) -> Self {
        Self {
            dim_alpha: ui.overlay_alpha,
            outline_width: ui.outline_width,
            ..Self::default()
        }
    }
}

/// Dim `background` and cut out the selected rectangle with an outline.
///
/// `bounds` places the background on the screen; `selection` is in screen
/// coordinates.
pub fn render_overlay(
    background: &RgbaImage,
    bounds: ScreenRect,
    selection: Option<ScreenRect>,
    style: &OverlayStyle,
) -> RgbaImage {
    let keep = u32::from(255 - style.dim_alpha);
    let local = selection.and_then(|rect| {
        let rect = ScreenRect {
            x: rect.x - bounds.x,
            y: rect.y - bounds.y,
            ..rect
        };
        ScreenRect::new(0, 0, background.width(), background.height()).intersect(&rect)
    });

    let mut frame = RgbaImage::from_fn(background.width(), background.height(), |x, y| {
        let px = *background.get_pixel(x, y);
        let inside = local.is_some_and(|r| {
            let (x, y) = (i64::from(x), i64::from(y));
            x >= i64::from(r.x) && x < r.right() && y >= i64::from(r.y) && y < r.bottom()
        });
        if inside {
            return px;
        }
        let dim = |c: u8| ((u32::from(c) * keep + 127) / 255) as u8;
        Rgba([dim(px[0]), dim(px[1]), dim(px[2]), px[3]])
    });

    if let Some(r) = local {
        for i in 0..style.outline_width as i32 {
            let outline = Rect::at(r.x - i, r.y - i).of_size(r.width + 2 * i as u32, r.height + 2 * i as u32);
            draw_hollow_rect_mut(&mut frame, outline, style.outline);
        }
    }

    frame
}
