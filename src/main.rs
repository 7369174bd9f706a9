use clap::Parser;
use eyre::{Context, Result, eyre};
use raindrop_clipper::{BatchStatus, ConvertConfig, ConvertError, execute};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Convert a Raindrop.io CSV backup to Obsidian Web Clipper markdown files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:
  raindrop-clipper bookmarks.csv
  raindrop-clipper bookmarks.csv my_notes
  raindrop-clipper bookmarks.csv /path/to/obsidian/vault")]
struct Cli {
    /// Path to the Raindrop CSV backup file.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory for markdown files.
    /// Defaults to ./output if not set in config.
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/raindrop-clipper/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Field delimiter (single ASCII character). Auto-detected if omitted.
    #[arg(long, value_name = "CHAR", value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Print each file written; repeat for debug logging.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress standard output (progress and summary).
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    output_dir: Option<PathBuf>,
    delimiter: Option<String>,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    let s = if s == "\\t" { "\t" } else { s };
    match s.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(format!("expected a single ASCII character, got {s:?}")),
    }
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        dirs::config_dir()
            .map(|d| d.join("raindrop-clipper/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 | 1 => "warn",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    // 1. Load config file (CLI path > default path)
    let file_cfg = load_file_config(cli.config.as_deref())?;

    // 2. Resolve output_dir (CLI > Config > Default)
    let output_dir = cli
        .output_dir
        .or(file_cfg.output_dir)
        .unwrap_or_else(|| PathBuf::from("output"));

    // 3. Resolve delimiter (CLI > Config > Sniffed)
    let delimiter = match (cli.delimiter, file_cfg.delimiter) {
        (Some(d), _) => Some(d),
        (None, Some(d)) => Some(
            parse_delimiter(&d).map_err(|e| eyre!("Invalid delimiter in config: {}", e))?,
        ),
        (None, None) => None,
    };

    if !cli.input.exists() {
        eprintln!(
            "Error: Input file '{}' does not exist.",
            cli.input.display()
        );
        return Ok(ExitCode::from(1));
    }

    let config = ConvertConfig {
        input: cli.input,
        output_dir,
        delimiter,
        verbose: cli.verbose > 0,
        quiet: cli.quiet,
    };

    // 4. Run the conversion
    let report = execute(&config);

    if report.status == BatchStatus::AbortedOnOpen {
        match &report.error {
            Some(e @ ConvertError::SourceNotFound(_)) => eprintln!("Error: {e}."),
            Some(e) => eprintln!("Error: {e}"),
            None => {}
        }
    } else if !config.quiet {
        report.print_summary(&config.output_dir);
    }

    Ok(ExitCode::from(report.exit_code()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}
