use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use ocrgrab_core::{OcrOutcome, OverlayStyle, RasterImage, render_overlay};
use ocrgrab_types::{OcrMode, ScreenRect};
use tracing_subscriber::EnvFilter;

pub mod clipboard;
pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod shell;
pub mod state;
pub mod status;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

/// Select a screen region and read the text in it
#[derive(Parser)]
#[command(name = "ocrgrab", version)]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run OCR once on a screen region or an image file
    Grab(GrabArgs),
    /// Speak the JSON line protocol on stdin/stdout
    Serve,
    /// Capture the configured region whenever the hotkey is pressed
    Listen,
    /// List installed language packs
    Langs,
}

#[derive(Args)]
struct GrabArgs {
    #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
    x: i32,
    #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
    y: i32,
    #[arg(long, default_value_t = 0)]
    width: u32,
    #[arg(long, default_value_t = 0)]
    height: u32,

    /// printed, handwriting or kannada; config default when omitted
    #[arg(long)]
    mode: Option<OcrMode>,

    /// Copy the text to the clipboard as well
    #[arg(long)]
    copy: bool,

    /// Read this image instead of the screen
    #[arg(long)]
    image: Option<PathBuf>,

    /// Write the selection overlay over the current screen as PNG
    #[arg(long)]
    overlay_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = profile::load_config(cli.config.as_deref())?;
    let state = AppState::new(config);

    match cli.command {
        Command::Grab(args) => grab(&state, args),
        Command::Langs => langs(&state),
        Command::Serve => run_async(serve(&state)),
        Command::Listen => run_async(listen(&state)),
    }
}

async fn serve(state: &AppState) -> anyhow::Result<()> {
    state.check_languages();
    let mut shell = state.shell();
    AppController::new().serve(&mut shell).await
}

async fn listen(state: &AppState) -> anyhow::Result<()> {
    state.check_languages();
    let mut shell = state.shell();
    let region = match state.config.ocr.capture_region {
        Some(region) => region,
        None => shell.screen_bounds()?,
    };
    AppController::new()
        .listen(&mut shell, state.config.ui.hotkey.clone(), region)
        .await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Single-threaded runtime; stdin reads cannot be cancelled, so shutdown does not wait on them
fn run_async<F>(future: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let result = runtime.block_on(future);
    runtime.shutdown_timeout(Duration::from_millis(200));
    result
}

fn grab(state: &AppState, args: GrabArgs) -> anyhow::Result<()> {
    state.check_languages();
    let mut shell = state.shell().with_copy_on_success(args.copy || state.config.ui.copy_on_success);
    if let Some(mode) = args.mode {
        shell.set_mode(mode);
    }

    let rect = ScreenRect::new(args.x, args.y, args.width, args.height);

    if let Some(path) = &args.overlay_out {
        let (bounds, background) = ocrgrab_ocr::capture_full_screen()?;
        let selection = (!rect.is_empty()).then_some(rect);
        let frame = render_overlay(&background, bounds, selection, &OverlayStyle::from(&state.config.ui));
        frame
            .save(path)
            .with_context(|| format!("Failed to write overlay to {}", path.display()))?;
        tracing::info!("Overlay written to {}", path.display());
    }

    match &args.image {
        Some(path) => {
            let image = RasterImage::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            shell.on_image(&image);
        }
        None => {
            shell.on_region_selected(rect);
        }
    }

    match shell.last_outcome() {
        Some(OcrOutcome::Text(text)) => println!("{text}"),
        Some(OcrOutcome::Empty) => eprintln!("No text found"),
        Some(OcrOutcome::Failed(message)) => bail!("{message}"),
        None => {}
    }
    Ok(())
}

fn langs(state: &AppState) -> anyhow::Result<()> {
    for lang in state.engine().available_languages()? {
        println!("{lang}");
    }
    state.check_languages();
    Ok(())
}
