use crate::config::Config;
use crate::error::{Result, SubzhError};
use crate::subtitle::srt;
use crate::translate::{GeminiTranslator, Translator};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Options for a translation run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Delay between consecutive API requests.
    pub request_delay: Duration,
    /// Verify the API key with a ping before translating.
    pub check_connection: bool,
    /// Show a progress bar.
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(500),
            check_connection: true,
            show_progress: true,
        }
    }
}

/// Result of a translation run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Path to the output subtitle file.
    pub output_path: PathBuf,
    /// Total number of cues in the input.
    pub total_cues: usize,
    /// Cues successfully translated.
    pub translated: usize,
    /// Cues left untranslated after an API failure.
    pub failed: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Translate an SRT file from English to Traditional Chinese.
///
/// Reads and parses the input, translates each cue in order with the
/// configured translator, and writes the result as SRT. A cue whose
/// translation fails keeps its original text; only file-level problems
/// (missing input, parse errors, a failed connection check) abort the run.
pub async fn translate_file(
    input: &Path,
    output: &Path,
    config: &Config,
    options: PipelineOptions,
) -> Result<PipelineResult> {
    let api_key = config
        .gemini_api_key
        .as_ref()
        .ok_or_else(|| {
            SubzhError::Config(
                "Gemini API key not set. Set GEMINI_API_KEY environment variable.".to_string(),
            )
        })?
        .clone();

    let translator = GeminiTranslator::new(api_key).with_model(config.model.clone());
    translate_file_with(input, output, &translator, options).await
}

/// Like [`translate_file`] but with a caller-supplied translator.
pub async fn translate_file_with(
    input: &Path,
    output: &Path,
    translator: &dyn Translator,
    options: PipelineOptions,
) -> Result<PipelineResult> {
    let start_time = Instant::now();

    if !input.exists() {
        return Err(SubzhError::FileNotFound(input.display().to_string()));
    }

    if options.check_connection {
        info!("Checking {} API connection", translator.name());
        translator.check_connection().await.map_err(|e| {
            SubzhError::Api(format!("API connection check failed: {}", e))
        })?;
    }

    info!("Reading {:?}", input);
    let content = fs::read_to_string(input)?;
    let mut cues = srt::parse(&content)?;
    info!("Parsed {} cues", cues.len());

    let progress = if options.show_progress && !cues.is_empty() {
        let pb = ProgressBar::new(cues.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} cues {msg}")
                .expect("valid progress template")
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let total_cues = cues.len();
    let mut translated = 0usize;
    let mut failed = 0usize;

    for (i, cue) in cues.iter_mut().enumerate() {
        match translator.translate(&cue.text).await {
            Ok(text) if !text.is_empty() => {
                cue.text = text;
                translated += 1;
            }
            Ok(_) => {
                warn!("Cue {}: empty translation, keeping original text", cue.index);
                failed += 1;
            }
            Err(e) => {
                warn!("Cue {}: translation failed, keeping original text: {}", cue.index, e);
                failed += 1;
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }

        // Space out requests; skip the delay after the last cue
        if i + 1 < total_cues && !options.request_delay.is_zero() {
            tokio::time::sleep(options.request_delay).await;
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    fs::write(output, srt::format(&cues))?;
    info!("Wrote {} cues to {:?}", cues.len(), output);

    Ok(PipelineResult {
        output_path: output.to_path_buf(),
        total_cues,
        translated,
        failed,
        elapsed: start_time.elapsed(),
    })
}

/// Print a summary of the translation run.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                     Translation Complete                       ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:      {}", result.output_path.display());
    println!("  Cues:        {}", result.total_cues);
    println!("  Translated:  {}", result.translated);
    if result.failed > 0 {
        println!("  Kept as-is:  {} (translation failed)", result.failed);
    }
    println!("  Time:        {:.1}s", result.elapsed.as_secs_f64());
    println!();
}
