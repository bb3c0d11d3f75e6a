use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "segno", version, about = "Renders fenced music notation and chord diagrams in markdown to inline SVG")]
pub struct Cli {
    /// Path to a TOML configuration file. Without this flag, `segno.toml`
    /// in the working directory is used when present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Transform a document, replacing music and chord blocks with SVG.
    Render {
        /// Markdown document to transform.
        input: PathBuf,
        /// Write the result here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate candidate blocks without invoking any external renderer.
    Check {
        /// Markdown document to inspect.
        input: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_parses_with_output_flag() {
        let cli = Cli::parse_from(["segno", "render", "book.md", "-o", "out.md"]);
        match cli.command {
            Command::Render { input, output } => {
                assert_eq!(input, PathBuf::from("book.md"));
                assert_eq!(output, Some(PathBuf::from("out.md")));
            }
            _ => panic!("expected render subcommand"),
        }
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::parse_from(["segno", "check", "book.md", "-vv", "--config", "other.toml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("other.toml")));
    }
}
