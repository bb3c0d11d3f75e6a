//! Notation compiler subprocess adapter.
//!
//! Wraps the external engraving executable (LilyPond by default): source is
//! written to a scratch directory, compiled with the SVG backend, and the
//! produced document read back. The adapter owns nothing long-lived: each
//! call spawns one process under a fixed wait budget.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::instrument;

/// Longest stderr excerpt carried into a [`ErrorKind::CompilerFailed`].
/// Compiler output can run to pages; the first lines carry the diagnosis.
const STDERR_EXCERPT_BYTES: usize = 600;

/// Configuration for the notation compiler adapter.
#[derive(Debug, Clone)]
pub struct NotationConfig {
    /// Compiler executable name or path, resolved through PATH.
    pub executable: PathBuf,
    /// Wall-clock budget per compilation. On expiry the compiler is killed
    /// and the current block fails; sibling blocks are unaffected.
    pub timeout: Duration,
    /// Extra flags appended after the built-in SVG backend flags.
    pub extra_args: Vec<String>,
}

impl Default for NotationConfig {
    fn default() -> Self {
        Self { executable: PathBuf::from("lilypond"), timeout: Duration::from_secs(30), extra_args: Vec::new() }
    }
}

/// Adapter around the notation compiler executable.
pub struct NotationRenderer {
    executable: PathBuf,
    timeout: Duration,
    extra_args: Vec<String>,
}

impl NotationRenderer {
    /// Resolves the configured executable through PATH; failing fast here
    /// beats failing on the first block.
    pub fn new(config: &NotationConfig) -> Result<Self> {
        let executable = which::which(&config.executable)
            .or_raise(|| ErrorKind::CompilerNotFound(config.executable.display().to_string()))?;
        Ok(Self { executable, timeout: config.timeout, extra_args: config.extra_args.clone() })
    }

    /// Compiles one block of notation source into a single SVG document.
    ///
    /// The returned markup is raw compiler output, attribution decoration
    /// and page-sized bounding box included; callers are expected to pass
    /// it through the repair engine.
    #[instrument(skip_all, fields(source_size = source.len()))]
    pub async fn render(&self, source: &str) -> Result<String> {
        let workdir = tempfile::tempdir().or_raise(|| ErrorKind::Io)?;
        let input = workdir.path().join("score.ly");
        tokio::fs::write(&input, source).await.or_raise(|| ErrorKind::Io)?;
        let mut command = Command::new(&self.executable);
        command
            .args(["-dbackend=svg", "-dno-point-and-click", "--loglevel=WARNING"])
            .args(&self.extra_args)
            .arg("--output")
            .arg(workdir.path())
            .arg(&input)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(output) => output.or_raise(|| ErrorKind::Io)?,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "notation compiler did not finish in time");
                exn::bail!(ErrorKind::Timeout);
            }
        };
        if !output.status.success() {
            exn::bail!(ErrorKind::CompilerFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: excerpt(&String::from_utf8_lossy(&output.stderr)),
            });
        }
        let svg = self.find_output(workdir.path()).await?;
        tokio::fs::read_to_string(&svg).await.or_raise(|| ErrorKind::Io)
    }

    /// The compiler names its output after the input file, but multi-page
    /// scores produce numbered siblings; take the primary document first,
    /// otherwise the alphabetically-first SVG.
    async fn find_output(&self, dir: &std::path::Path) -> Result<PathBuf> {
        let primary = dir.join("score.svg");
        if tokio::fs::try_exists(&primary).await.unwrap_or(false) {
            return Ok(primary);
        }
        let mut entries = tokio::fs::read_dir(dir).await.or_raise(|| ErrorKind::Io)?;
        let mut candidates = Vec::new();
        while let Some(entry) = entries.next_entry().await.or_raise(|| ErrorKind::Io)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "svg") {
                candidates.push(path);
            }
        }
        candidates.sort();
        match candidates.into_iter().next() {
            Some(path) => Ok(path),
            None => exn::bail!(ErrorKind::NoOutput),
        }
    }
}

/// Trims compiler stderr to a bounded, single-excerpt diagnosis.
fn excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.len() <= STDERR_EXCERPT_BYTES {
        return trimmed.to_string();
    }
    let mut cut = STDERR_EXCERPT_BYTES;
    while !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &trimmed[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_stderr_passes_through_trimmed() {
        assert_eq!(excerpt("  error: bad note\n"), "error: bad note");
    }

    #[test]
    fn long_stderr_is_cut_at_a_char_boundary() {
        let noisy = "ä".repeat(1000);
        let cut = excerpt(&noisy);
        assert!(cut.len() <= STDERR_EXCERPT_BYTES + '…'.len_utf8());
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn missing_executable_is_a_typed_failure() {
        let config = NotationConfig {
            executable: PathBuf::from("definitely-not-a-real-notation-compiler"),
            ..NotationConfig::default()
        };
        assert!(NotationRenderer::new(&config).is_err());
    }
}
