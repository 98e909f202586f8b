use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use subzh::config::Config;
use subzh::interactive::{derive_output_path, run_interactive_wizard};
use subzh::pipeline::{print_summary, translate_file, PipelineOptions};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "subzh")]
#[command(version, about = "Translate English SRT subtitles to Traditional Chinese")]
#[command(long_about = "Translate an English .srt subtitle file to Traditional Chinese using the Google Gemini API. Run without arguments for an interactive wizard.")]
struct Cli {
    /// Input SRT file (prompted for if omitted)
    input: Option<PathBuf>,

    /// Output SRT file (defaults to input name with a .zh.srt extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Gemini API key (overrides GEMINI_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Skip the API connection check before translating
    #[arg(long)]
    no_check: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(key) = cli.api_key {
        config.gemini_api_key = Some(key);
    }

    // With an input file and a key already available, run straight
    // through; otherwise fall back to the interactive wizard.
    let (input, output, mut config) = match (cli.input, config.gemini_api_key.is_some()) {
        (Some(input), true) => {
            if !input.exists() {
                anyhow::bail!("Input file not found: {}", input.display());
            }
            let output = cli.output.unwrap_or_else(|| derive_output_path(&input));
            (input, output, config)
        }
        (input, _) => {
            let wizard = run_interactive_wizard(input, cli.output)?;
            (wizard.input, wizard.output, wizard.config)
        }
    };

    if let Some(model) = cli.model {
        config.model = model;
    }
    config.validate().context("Configuration validation failed")?;

    info!("Input:  {}", input.display());
    info!("Output: {}", output.display());
    info!("Model:  {}", config.model);

    let options = PipelineOptions {
        request_delay: Duration::from_millis(config.request_delay_ms),
        check_connection: !cli.no_check,
        show_progress: true,
    };

    let result = translate_file(&input, &output, &config, options)
        .await
        .context("Translation failed")?;

    print_summary(&result);

    Ok(())
}
