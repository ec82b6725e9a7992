//! Binary entrypoint: pre-render slideshow markup for an HTML page.
//!
//! Delegates all logic to the library crate.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use wpg_slideshow::{MarkupConfig, NavClick, SlideshowPage};

#[derive(Debug, Parser)]
#[command(
    name = "wpg-slideshow",
    version,
    about = "Turn WordPress gallery blocks into prev/next slideshows"
)]
struct Cli {
    /// HTML page to transform ("-" reads stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the transformed page here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// YAML markup configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Replay a navigation click after activation, e.g. `0:next` (repeatable)
    #[arg(long = "click", value_name = "ID:DIR")]
    clicks: Vec<NavClick>,

    /// Print one line per slideshow instead of the page
    #[arg(long)]
    summary: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(
            format!("wpg_slideshow={level}")
                .parse()
                .context("building log filter")?,
        );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut html = String::new();
        io::stdin()
            .read_to_string(&mut html)
            .context("reading page from stdin")?;
        return Ok(html);
    }
    fs::read_to_string(input).with_context(|| format!("reading page from {}", input.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => MarkupConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?
            .validated()
            .context("invalid configuration values")?,
        None => MarkupConfig::default(),
    };

    let html = read_input(&cli.input)?;
    let mut page = SlideshowPage::activate(&html, &config).context("activating slideshows")?;
    for click in &cli.clicks {
        let changed = page
            .navigate(*click)
            .with_context(|| format!("replaying click {}:{}", click.gallery, click.direction))?;
        info!(
            gallery = changed.gallery,
            from = changed.from,
            to = changed.to,
            "replayed click"
        );
    }

    let rendered = if cli.summary {
        page.controller()
            .galleries()
            .iter()
            .map(|g| {
                format!(
                    "slideshow {}: {} slides, showing {}\n",
                    g.id(),
                    g.image_count(),
                    g.position().index()
                )
            })
            .collect::<String>()
    } else {
        page.to_html()
    };

    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("writing page to {}", path.display()))?,
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("writing page to stdout")?,
    }
    Ok(())
}
