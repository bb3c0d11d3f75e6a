//! `segno` renders fenced music notation and chord diagrams in markdown
//! documents to inline SVG, via the external notation compiler and a
//! headless browser running the bundled chart script.

mod cli;
mod config;
mod error;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use segno_pipeline::{BlockKind, Renderers};
use segno_render::{ChordRenderer, NotationRenderer};
use std::path::Path;
use tokio::io::AsyncWriteExt;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(error) = run(cli).await {
        tracing::error!(?error, "aborting");
        eprintln!("error: {error:?}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "segno=info",
        2 => "segno=debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Render { input, output } => render(&config, &input, output.as_deref()).await,
        Command::Check { input } => check(&config, &input).await,
    }
}

async fn render(config: &Config, input: &Path, output: Option<&Path>) -> Result<()> {
    let document = tokio::fs::read_to_string(input).await.or_raise(|| ErrorKind::Io)?;
    // One instance of each renderer for the whole document; blocks are
    // dispatched against them sequentially.
    let notation = NotationRenderer::new(&config.notation_config()).or_raise(|| ErrorKind::Renderer)?;
    let chords = ChordRenderer::new(&config.browser_config()).or_raise(|| ErrorKind::Renderer)?;
    let renderers = Renderers { notation, chords };
    let transformed = segno_pipeline::transform(&document, &renderers, &config.transform_options())
        .await
        .or_raise(|| ErrorKind::Transform)?;
    renderers.chords.close();
    match output {
        Some(path) => tokio::fs::write(path, transformed).await.or_raise(|| ErrorKind::Io)?,
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(transformed.as_bytes()).await.or_raise(|| ErrorKind::Io)?;
            stdout.flush().await.or_raise(|| ErrorKind::Io)?;
        }
    }
    Ok(())
}

/// Parses and validates every candidate block without touching the
/// external renderers, so authors get fast feedback on chord JSON and
/// empty fences.
async fn check(config: &Config, input: &Path) -> Result<()> {
    let document = tokio::fs::read_to_string(input).await.or_raise(|| ErrorKind::Io)?;
    let options = config.transform_options();
    let blocks = segno_pipeline::find_blocks(&document, &options);
    let mut problems = 0usize;
    for block in &blocks {
        match block.kind {
            BlockKind::Chord => {
                if let Err(error) = segno_chord::normalize(&block.source, &options.chord_defaults) {
                    problems += 1;
                    eprintln!("{}:{}: invalid chord block: {error:?}", input.display(), block.line);
                }
            }
            BlockKind::Music => {
                if block.source.trim().is_empty() {
                    problems += 1;
                    eprintln!("{}:{}: music block is empty", input.display(), block.line);
                }
            }
        }
    }
    println!("{}: {} candidate block(s), {} problem(s)", input.display(), blocks.len(), problems);
    if problems > 0 {
        exn::bail!(ErrorKind::CheckFailed(problems));
    }
    Ok(())
}
