//! Host platform lookup for the "open with default viewer" command.

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Operating system families that have a known default-viewer command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS: `open`
    MacOs,
    /// Linux and the BSDs: `xdg-open`
    Freedesktop,
    /// Windows: `start`, which is a `cmd` builtin
    Windows,
}

/// Program plus leading arguments; the preview path is appended last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl OpenCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` value to a platform family.
    pub fn from_os(os: &'static str) -> Result<Self> {
        match os {
            "macos" => Ok(Platform::MacOs),
            "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Ok(Platform::Freedesktop),
            "windows" => Ok(Platform::Windows),
            other => Err(ConversionError::UnsupportedPlatform(other)),
        }
    }

    pub fn open_command(self) -> OpenCommand {
        match self {
            Platform::MacOs => OpenCommand::new("open", &[]),
            Platform::Freedesktop => OpenCommand::new("xdg-open", &[]),
            // The empty string is the window title `start` expects when the
            // target is quoted.
            Platform::Windows => OpenCommand::new("cmd", &["/C", "start", ""]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_platforms() {
        assert_eq!(Platform::from_os("macos").unwrap().open_command().program, "open");
        assert_eq!(Platform::from_os("linux").unwrap().open_command().program, "xdg-open");
        assert_eq!(Platform::from_os("freebsd").unwrap(), Platform::Freedesktop);

        let windows = Platform::from_os("windows").unwrap().open_command();
        assert_eq!(windows.program, "cmd");
        assert_eq!(windows.args, vec!["/C", "start", ""]);
    }

    #[test]
    fn test_unknown_platform() {
        assert!(matches!(
            Platform::from_os("haiku"),
            Err(ConversionError::UnsupportedPlatform("haiku"))
        ));
    }
}
