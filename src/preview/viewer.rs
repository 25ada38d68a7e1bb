use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::preview::platform::{OpenCommand, Platform};

/// Shows a file to the operator.
pub trait ViewerLauncher {
    fn open(&self, path: &Path) -> Result<()>;
}

/// Opens files with the host's default viewer.
///
/// The process is waited on; there is no timeout, only the exit status is
/// observed.
#[derive(Debug, Clone, Default)]
pub struct SystemViewer {
    command: Option<OpenCommand>,
}

impl SystemViewer {
    /// Resolves the platform's open command on every call to `open`.
    pub fn new() -> Self {
        Self { command: None }
    }

    pub fn with_command(command: OpenCommand) -> Self {
        Self {
            command: Some(command),
        }
    }

    fn resolve(&self) -> Result<OpenCommand> {
        match &self.command {
            Some(command) => Ok(command.clone()),
            None => Ok(Platform::current()?.open_command()),
        }
    }
}

impl ViewerLauncher for SystemViewer {
    fn open(&self, path: &Path) -> Result<()> {
        let command = self.resolve()?;
        debug!(program = %command.program, path = %path.display(), "Launching viewer");

        let output = Command::new(&command.program)
            .args(&command.args)
            .arg(path)
            .output()
            .map_err(|e| ConversionError::ViewerProcessFailure {
                command: command.program.clone(),
                status: format!("failed to start: {e}"),
                stdout: String::new(),
                stderr: String::new(),
            })?;

        if !output.status.success() {
            return Err(ConversionError::ViewerProcessFailure {
                command: command.program,
                status: output.status.to_string(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_path_as_last_argument() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("opened");
        let viewer = SystemViewer::with_command(OpenCommand::new(
            "sh",
            &["-c", "touch \"$1\"", "sh"],
        ));

        viewer.open(&marker).unwrap();

        assert!(marker.exists());
    }

    #[test]
    fn test_non_zero_exit_captures_output() {
        let viewer = SystemViewer::with_command(OpenCommand::new(
            "sh",
            &["-c", "echo to-stdout; echo to-stderr >&2; exit 3", "sh"],
        ));

        match viewer.open(Path::new("preview.tif")) {
            Err(ConversionError::ViewerProcessFailure { command, stdout, stderr, .. }) => {
                assert_eq!(command, "sh");
                assert_eq!(stdout.trim(), "to-stdout");
                assert_eq!(stderr.trim(), "to-stderr");
            }
            other => panic!("expected ViewerProcessFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_viewer_failure() {
        let viewer = SystemViewer::with_command(OpenCommand::new("definitely-not-a-viewer-xyz", &[]));

        assert!(matches!(
            viewer.open(Path::new("preview.tif")),
            Err(ConversionError::ViewerProcessFailure { .. })
        ));
    }
}
