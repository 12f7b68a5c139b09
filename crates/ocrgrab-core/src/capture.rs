use ocrgrab_types::ScreenRect;

use crate::error::CaptureError;
use crate::raster::RasterImage;

/// Source of screen pixels
pub trait ScreenCapturer {
    /// Grab exactly `rect` from the current screen contents.
    fn capture(&self, rect: ScreenRect) -> Result<RasterImage, CaptureError>;

    /// Area a selection session may cover.
    fn screen_bounds(&self) -> Result<ScreenRect, CaptureError>;
}
