use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::process::{Command, Output, Stdio};

use ocrgrab_config::ocr::TesseractConfig;
use ocrgrab_core::{RasterImage, RecognitionError, RecognizeOptions, Recognizer};

/// Runs the `tesseract` command line tool once per image.
///
/// The image goes in as PNG on stdin and the text comes back on stdout, so
/// nothing touches the filesystem.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    config: TesseractConfig,
}

impl TesseractEngine {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TesseractConfig {
        &self.config
    }

    /// First line of `tesseract --version`
    pub fn version(&self) -> Result<String, RecognitionError> {
        let output = self.run(&["--version".into()])?;
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.lines().next().unwrap_or_default().trim().to_string())
    }

    /// Language packs the engine can load
    pub fn available_languages(&self) -> Result<Vec<String>, RecognitionError> {
        let mut args = self.tessdata_args();
        args.push("--list-langs".into());
        let output = self.run(&args)?;
        if !output.status.success() {
            return Err(RecognitionError::Engine(stderr_message(&output.stderr)));
        }
        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }

    /// Which of `required` have no trained data installed
    pub fn missing_languages(&self, required: &[&str]) -> Result<Vec<String>, RecognitionError> {
        let installed = self.available_languages()?;
        Ok(required
            .iter()
            .filter(|lang| !installed.iter().any(|have| have == *lang))
            .map(|lang| lang.to_string())
            .collect())
    }

    fn tessdata_args(&self) -> Vec<OsString> {
        match &self.config.tessdata_dir {
            Some(dir) => vec!["--tessdata-dir".into(), dir.clone().into_os_string()],
            None => Vec::new(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.command);
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd
    }

    fn run(&self, args: &[OsString]) -> Result<Output, RecognitionError> {
        self.command().args(args).output().map_err(|e| self.spawn_error(e))
    }

    fn spawn_error(&self, e: std::io::Error) -> RecognitionError {
        if e.kind() == ErrorKind::NotFound {
            RecognitionError::EngineMissing {
                command: self.config.command.clone(),
                source: e,
            }
        } else {
            RecognitionError::Io(e)
        }
    }
}

impl Recognizer for TesseractEngine {
    fn recognize(&self, image: &RasterImage, options: &RecognizeOptions) -> Result<String, RecognitionError> {
        let png = image.encode_png()?;

        let mut args = self.tessdata_args();
        args.extend(recognize_args(options));
        tracing::debug!("running {} {:?}", self.config.command.display(), args);

        let mut child = self
            .command()
            .args(&args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // Engine may exit early on a bad language pack and close the pipe
            if let Err(e) = stdin.write_all(&png) {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(classify_failure(&output.stderr, &options.language));
        }

        Ok(clean_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// `stdin stdout -l LANG [--oem N] [--psm N] [--dpi N]`
fn recognize_args(options: &RecognizeOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["stdin".into(), "stdout".into(), "-l".into(), options.language.clone().into()];
    if let Some(mode) = options.engine_mode {
        args.push("--oem".into());
        args.push(mode.code().to_string().into());
    }
    if let Some(psm) = options.page_segmentation {
        args.push("--psm".into());
        args.push(psm.code().to_string().into());
    }
    if let Some(dpi) = options.dpi {
        args.push("--dpi".into());
        args.push(dpi.to_string().into());
    }
    args
}

fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
        .map(str::to_string)
        .collect()
}

fn classify_failure(stderr: &[u8], language: &str) -> RecognitionError {
    let message = String::from_utf8_lossy(stderr);

    if let Some(rest) = message.split("Failed loading language '").nth(1) {
        let lang = rest.split('\'').next().unwrap_or(language);
        return RecognitionError::LanguagePackMissing(lang.to_string());
    }
    if message.contains("couldn't load any languages") {
        return RecognitionError::LanguagePackMissing(language.to_string());
    }

    RecognitionError::Engine(stderr_message(stderr))
}

fn stderr_message(stderr: &[u8]) -> String {
    let message = String::from_utf8_lossy(stderr);
    let last = message.lines().rev().find(|line| !line.trim().is_empty());
    match last {
        Some(line) => line.trim().to_string(),
        None => "engine exited without a message".to_string(),
    }
}

/// Drops the trailing page break the engine appends
fn clean_output(stdout: &str) -> String {
    stdout.replace('\u{c}', "").trim_end().to_string()
}
