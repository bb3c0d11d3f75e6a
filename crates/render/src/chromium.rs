use crate::error::{ErrorKind, Result};
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;
use tokio::process::Command;

/// Represents a Chromium/Chrome executable.
pub(crate) enum Chromium {
    /// A directly executable binary.
    Binary { path: PathBuf },
    /// A Flatpak-installed application.
    Flatpak { app_id: String },
}
impl Chromium {
    /// Locates a browser, preferring an explicitly configured executable
    /// over PATH discovery, and PATH discovery over Flatpak installations.
    pub(crate) fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(configured) = explicit {
            if let Ok(path) = which::which(configured) {
                return Ok(Self::Binary { path });
            }
            tracing::warn!(configured = %configured.display(), "configured browser not found; falling back to discovery");
        }
        // Check for direct executables
        // TODO: What are the executable names on Windows? macOS?
        let executables = ["chromium", "chromium-browser", "google-chrome", "chrome"];
        for exe in executables {
            if let Ok(path) = which::which(exe) {
                return Ok(Self::Binary { path });
            }
        }
        tracing::info!("Chromium executable not found in PATH");
        if let Ok(flatpak) = which::which("flatpak") {
            tracing::trace!(flatpak = %flatpak.display(), "Discovered Flatpak on system; searching installed apps");
            // Check Flatpak installations
            let flatpak_apps = ["org.chromium.Chromium", "com.google.Chrome"];
            for app_id in flatpak_apps {
                if StdCommand::new(&flatpak).args(["info", app_id]).output().is_ok_and(|o| o.status.success()) {
                    return Ok(Self::Flatpak { app_id: app_id.to_string() });
                }
            }
        } else {
            tracing::info!("Flatpak not found; skipping containerized Chromium checks.");
        }
        exn::bail!(ErrorKind::ChromiumNotFound);
    }

    /// Builds a bare command for the browser; the caller adds headless
    /// flags and the page to load.
    pub(crate) fn command(&self) -> Command {
        match self {
            Self::Binary { path } => Command::new(path),
            Self::Flatpak { app_id } => {
                let mut command = Command::new("flatpak");
                command.args(["run", app_id]);
                command
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatpak_variant_runs_through_flatpak() {
        let chromium = Chromium::Flatpak { app_id: "org.chromium.Chromium".to_string() };
        let command = chromium.command();
        assert_eq!(command.as_std().get_program().to_str(), Some("flatpak"));
        let args: Vec<_> = command.as_std().get_args().filter_map(|a| a.to_str()).collect();
        assert_eq!(args, ["run", "org.chromium.Chromium"]);
    }

    #[test]
    fn binary_variant_runs_directly() {
        let chromium = Chromium::Binary { path: PathBuf::from("/usr/bin/chromium") };
        let command = chromium.command();
        assert_eq!(command.as_std().get_program().to_str(), Some("/usr/bin/chromium"));
    }
}
