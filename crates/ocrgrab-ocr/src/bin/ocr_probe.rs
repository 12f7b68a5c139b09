//! Capture and OCR smoke test - run with: cargo run -p ocrgrab-ocr --bin ocr_probe

use anyhow::Result;
use ocrgrab_config::Config;
use ocrgrab_core::{FilterChain, OcrOutcome, Pipeline, RasterImage, ScreenCapturer};
use ocrgrab_ocr::{TesseractEngine, XcapCapturer};
use ocrgrab_types::{OcrMode, ScreenRect};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::new();
    tracing::info!("=== OCR probe ===");

    tracing::info!("1. Monitors:");
    for monitor in ocrgrab_ocr::list_monitors()? {
        tracing::info!("   {} {}{}", monitor.name, monitor.bounds, if monitor.primary { " (primary)" } else { "" });
    }

    let engine = TesseractEngine::new(config.ocr.tesseract.clone());
    tracing::info!("2. Engine: {}", engine.version()?);
    let missing = engine.missing_languages(&config.ocr.languages.required())?;
    if !missing.is_empty() {
        tracing::warn!("   Missing language packs: {}", missing.join(", "));
    }

    tracing::info!("3. Capturing top-left corner of the primary screen...");
    let bounds = XcapCapturer.screen_bounds()?;
    let rect = ScreenRect::new(bounds.x, bounds.y, bounds.width.min(800), bounds.height.min(200));
    let start = std::time::Instant::now();
    let image: RasterImage = XcapCapturer.capture(rect)?;
    tracing::info!("   {:?} in {:?}", image.dimensions(), start.elapsed());
    image.save(std::path::Path::new("probe_capture.png"))?;
    tracing::info!("   Saved to probe_capture.png");

    let pipeline = Pipeline::new(
        Box::new(XcapCapturer),
        Box::new(FilterChain::new(config.preprocess.clone())),
        Box::new(engine),
        config.ocr.clone(),
    );
    for mode in OcrMode::ALL {
        let start = std::time::Instant::now();
        match pipeline.run_pipeline(&image, mode) {
            OcrOutcome::Text(text) => {
                tracing::info!("4. {} - {} chars in {:?}", mode, text.len(), start.elapsed());
                for line in text.lines().take(5) {
                    tracing::info!("   > {}", line);
                }
            }
            outcome => tracing::info!("4. {} - {}", mode, outcome.status()),
        }
    }

    tracing::info!("=== Done ===");
    Ok(())
}
