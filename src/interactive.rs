use crate::config::Config;
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

pub struct InteractiveResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: Config,
}

/// Prompt for anything the command line didn't provide: API key, input
/// SRT path, and output path.
pub fn run_interactive_wizard(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<InteractiveResult> {
    print_header();

    let config = setup_api_key()?;

    let input = match input {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            path
        }
        None => select_input_file()?,
    };

    let output = match output {
        Some(path) => path,
        None => prompt_output_path(&input)?,
    };

    print_plan(&input, &output, &config.model);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    Ok(InteractiveResult {
        input,
        output,
        config,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║    subzh - English SRT → Traditional Chinese      ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn setup_api_key() -> anyhow::Result<Config> {
    let mut config = Config::load().unwrap_or_default();

    if config.gemini_api_key.is_some() {
        println!("{} API key configured", style("✓").green());
        return Ok(config);
    }

    println!("{} Gemini API key not found", style("!").yellow());
    println!("  Get one at: https://aistudio.google.com/apikey\n");

    let api_key: String = Input::new()
        .with_prompt("Enter your Gemini API key")
        .interact_text()?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key is required");
    }

    config.gemini_api_key = Some(api_key.trim().to_string());

    // Offer to save
    if Confirm::new()
        .with_prompt("Save API key to config file?")
        .default(true)
        .interact()?
    {
        config.save()?;
        println!("{} API key saved to config\n", style("✓").green());
    }

    Ok(config)
}

fn select_input_file() -> anyhow::Result<PathBuf> {
    println!("\n{}", style("Select input SRT file:").bold());

    let files = scan_srt_files(".")?;

    if files.is_empty() {
        println!("  No .srt files found in current directory.\n");
        return prompt_custom_path();
    }

    let mut items: Vec<String> = files
        .iter()
        .map(|f| {
            let size = fs::metadata(f)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{} ({})", f.display(), size)
        })
        .collect();
    items.push("Enter custom path...".to_string());

    let selection = Select::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == files.len() {
        prompt_custom_path()
    } else {
        Ok(files[selection].clone())
    }
}

fn prompt_custom_path() -> anyhow::Result<PathBuf> {
    let path: String = Input::new().with_prompt("Enter file path").interact_text()?;
    let path = PathBuf::from(path);
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(path)
}

fn prompt_output_path(input: &Path) -> anyhow::Result<PathBuf> {
    let default = derive_output_path(input);
    let path: String = Input::new()
        .with_prompt("Output SRT path")
        .default(default.display().to_string())
        .interact_text()?;
    Ok(PathBuf::from(path))
}

fn scan_srt_files(dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if ext.eq_ignore_ascii_case("srt") {
                    files.push(path);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// `movie.srt` → `movie.zh.srt`, next to the input.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!("{}.zh.srt", stem.to_string_lossy()));
    output
}

fn print_plan(input: &Path, output: &Path, model: &str) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Input:     {}", style(input.display()).cyan());
    println!("  Output:    {}", style(output.display()).cyan());
    println!("  Model:     {}", model);
    println!("  Translate: English → Traditional Chinese");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
    }

    #[test]
    fn test_derive_output_path() {
        let input = PathBuf::from("/path/to/movie.srt");
        assert_eq!(
            derive_output_path(&input),
            PathBuf::from("/path/to/movie.zh.srt")
        );
    }
}
