use image::RgbaImage;
use ocrgrab_core::{CaptureError, RasterImage, ScreenCapturer};
use ocrgrab_types::ScreenRect;
use xcap::Monitor;

#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub name: String,
    pub bounds: ScreenRect,
    pub primary: bool,
}

/// Screen grabs through `xcap`
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapCapturer;

impl ScreenCapturer for XcapCapturer {
    fn capture(&self, rect: ScreenRect) -> Result<RasterImage, CaptureError> {
        if rect.is_empty() {
            return Err(CaptureError::EmptyRegion(rect));
        }

        let monitors = Monitor::all().map_err(platform)?;
        let monitor = monitors
            .iter()
            .find(|m| monitor_bounds(m).contains_rect(&rect))
            .or_else(|| monitors.iter().find(|m| m.is_primary()))
            .or(monitors.first())
            .ok_or(CaptureError::NoMonitor)?;

        let bounds = monitor_bounds(monitor);
        let region = bounds
            .intersect(&rect)
            .ok_or(CaptureError::OutOfBounds(rect))?;
        if region != rect {
            tracing::debug!("capture region {} clipped to {}", rect, region);
        }

        let image = monitor.capture_image().map_err(platform)?;
        let cropped = xcap::image::imageops::crop_imm(
            &image,
            (region.x - bounds.x) as u32,
            (region.y - bounds.y) as u32,
            region.width,
            region.height,
        )
        .to_image();

        let (width, height) = cropped.dimensions();
        let rgba = RgbaImage::from_raw(width, height, cropped.into_raw())
            .ok_or_else(|| CaptureError::Platform("captured buffer has the wrong size".to_string()))?;
        Ok(RasterImage::from_rgba(rgba))
    }

    fn screen_bounds(&self) -> Result<ScreenRect, CaptureError> {
        let monitors = Monitor::all().map_err(platform)?;
        monitors
            .iter()
            .find(|m| m.is_primary())
            .or(monitors.first())
            .map(monitor_bounds)
            .ok_or(CaptureError::NoMonitor)
    }
}

/// Geometry of every connected monitor
pub fn list_monitors() -> Result<Vec<MonitorInfo>, CaptureError> {
    let monitors = Monitor::all().map_err(platform)?;
    Ok(monitors
        .iter()
        .map(|m| MonitorInfo {
            name: m.name().to_string(),
            bounds: monitor_bounds(m),
            primary: m.is_primary(),
        })
        .collect())
}

/// Whole primary monitor, used as the selection overlay background
pub fn capture_full_screen() -> Result<(ScreenRect, RgbaImage), CaptureError> {
    let monitors = Monitor::all().map_err(platform)?;
    let monitor = monitors
        .iter()
        .find(|m| m.is_primary())
        .or(monitors.first())
        .ok_or(CaptureError::NoMonitor)?;

    let image = monitor.capture_image().map_err(platform)?;
    let (width, height) = image.dimensions();
    let rgba = RgbaImage::from_raw(width, height, image.into_raw())
        .ok_or_else(|| CaptureError::Platform("captured buffer has the wrong size".to_string()))?;
    Ok((monitor_bounds(monitor), rgba))
}

fn monitor_bounds(monitor: &Monitor) -> ScreenRect {
    ScreenRect::new(monitor.x(), monitor.y(), monitor.width(), monitor.height())
}

fn platform(e: xcap::XCapError) -> CaptureError {
    CaptureError::Platform(e.to_string())
}
