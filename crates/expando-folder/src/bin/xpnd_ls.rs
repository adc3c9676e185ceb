//! xpnd-ls: list a directory through a folder format.
//!
//! ```text
//! xpnd-ls [DIR] [--format FMT] [--config FILE] [--width N]
//! ```
//!
//! The format comes from `--format`, else the `folder_format` key of the
//! config file, else the built-in default. Set `RUST_LOG=expando=trace` to
//! watch the format cache.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use expando::{cache, Error, FormatConfig};
use expando_folder::{
    read_dir, render_listing, DATE_FORMAT_KEY, DEFAULT_DATE_FORMAT, DEFAULT_FOLDER_FORMAT,
    FOLDER_FORMAT_DEFS, FORMAT_KEY,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_WIDTH: usize = 80;

/// List a directory like a mail client's folder browser
#[derive(Parser, Debug)]
#[command(name = "xpnd-ls")]
#[command(version)]
#[command(about = "List a directory through an expando folder format")]
struct Cli {
    /// Directory to list
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Folder format, overriding the config file
    #[arg(short, long)]
    format: Option<String>,

    /// YAML file of named formats
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Line width in columns (default: terminal width)
    #[arg(short, long)]
    width: Option<usize>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<FormatConfig> {
    let mut config = FormatConfig::new()
        .with_default(FORMAT_KEY, DEFAULT_FOLDER_FORMAT)
        .with_default(DATE_FORMAT_KEY, DEFAULT_DATE_FORMAT);

    if let Some(path) = &cli.config {
        let user = FormatConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        config.merge(&user);
    }
    if let Some(format) = &cli.format {
        config.set(FORMAT_KEY, format.as_str());
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = load_config(&cli)?;
    let formats = cache::global();

    let format = match formats.load(&config, FORMAT_KEY, FOLDER_FORMAT_DEFS) {
        Ok(format) => format,
        Err(Error::Parse(err)) => {
            eprintln!(
                "xpnd-ls: invalid format at offset {}: {}",
                err.position, err.message
            );
            formats.update(FORMAT_KEY, DEFAULT_FOLDER_FORMAT, FOLDER_FORMAT_DEFS)?
        }
        Err(err) => return Err(err.into()),
    };

    let width = cli
        .width
        .or_else(|| terminal_size::terminal_size().map(|(w, _)| w.0 as usize))
        .unwrap_or(DEFAULT_WIDTH);

    let entries = read_dir(&cli.dir)
        .with_context(|| format!("failed to read {}", cli.dir.display()))?;
    let date_format = config.get(DATE_FORMAT_KEY)?;

    for line in render_listing(&format, &entries, date_format, width)? {
        println!("{line}");
    }
    Ok(())
}
