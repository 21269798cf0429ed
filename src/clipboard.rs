/*!
 * Clipboard forwarding
 *
 * Copies the in-memory output to the system clipboard by piping it into
 * whichever clipboard helper program the platform offers.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// The helper could not be run or reported failure
    #[error("{helper}: {reason}")]
    HelperFailed { helper: &'static str, reason: String },

    /// No clipboard helper is installed
    #[error("no clipboard helper found")]
    NoHelperFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Clipboard helper programs, one per platform mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    Tmux,
    Pbcopy,
    WlCopy,
    Xsel,
    Xclip,
    ClipExe,
    Termux,
}

impl Helper {
    /// Executable name
    pub fn program(self) -> &'static str {
        match self {
            Self::Tmux => "tmux",
            Self::Pbcopy => "pbcopy",
            Self::WlCopy => "wl-copy",
            Self::Xsel => "xsel",
            Self::Xclip => "xclip",
            Self::ClipExe => "clip.exe",
            Self::Termux => "termux-clipboard-set",
        }
    }

    fn args(self) -> &'static [&'static str] {
        match self {
            Self::Tmux => &["load-buffer", "-w", "-"],
            Self::Xsel => &["-b", "-i"],
            Self::Xclip => &["-selection", "clipboard", "-in"],
            Self::Pbcopy | Self::WlCopy | Self::ClipExe | Self::Termux => &[],
        }
    }

    /// Pipe `text` into the helper and wait for it to finish
    pub fn copy(self, text: &str) -> Result<()> {
        let helper = self.program();
        let failed = |reason: String| ClipboardError::HelperFailed { helper, reason };

        let mut child = Command::new(helper)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| failed(format!("failed to start: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| failed(format!("failed to write: {}", e)))?;
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(failed(format!("exited with {}", status)))
        }
    }
}

/// Copy text to the clipboard with the first helper that works
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let helpers = available_helpers();
    let mut last_error = ClipboardError::NoHelperFound;

    for helper in helpers {
        match helper.copy(text) {
            Ok(()) => {
                debug!("copied {} bytes with {}", text.len(), helper.program());
                return Ok(());
            }
            Err(err) => {
                debug!("clipboard helper failed: {}", err);
                last_error = err;
            }
        }
    }

    Err(last_error)
}

/// Helpers worth trying on this system, in order of preference
pub fn available_helpers() -> Vec<Helper> {
    candidate_helpers(inside_tmux(), is_wsl())
        .into_iter()
        .filter(|helper| command_exists(helper.program()))
        .collect()
}

/// Candidate helpers for the current platform, before checking PATH
fn candidate_helpers(in_tmux: bool, wsl: bool) -> Vec<Helper> {
    let mut helpers = Vec::new();
    if in_tmux {
        helpers.push(Helper::Tmux);
    }

    if cfg!(target_os = "macos") {
        helpers.push(Helper::Pbcopy);
    } else if cfg!(target_os = "android") {
        helpers.push(Helper::Termux);
    } else if cfg!(target_os = "windows") || wsl {
        helpers.push(Helper::ClipExe);
    } else {
        helpers.extend([Helper::WlCopy, Helper::Xsel, Helper::Xclip]);
    }

    helpers
}

/// Check whether `command` is an executable file on PATH
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| is_executable(&dir.join(command))))
        .unwrap_or(false)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn inside_tmux() -> bool {
    env::var_os("TMUX").is_some()
}

fn is_wsl() -> bool {
    env::var_os("WSL_DISTRO_NAME").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_exists() {
        assert!(!command_exists("nonexistentcommandxyz"));
    }

    #[cfg(unix)]
    #[test]
    fn test_common_command_exists() {
        assert!(command_exists("sh"));
    }

    #[test]
    fn test_tmux_is_preferred() {
        let helpers = candidate_helpers(true, false);
        assert_eq!(helpers.first(), Some(&Helper::Tmux));
        assert!(!candidate_helpers(false, false).contains(&Helper::Tmux));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_helpers() {
        assert_eq!(
            candidate_helpers(false, false),
            [Helper::WlCopy, Helper::Xsel, Helper::Xclip]
        );
        assert_eq!(candidate_helpers(false, true), [Helper::ClipExe]);
    }

    #[test]
    #[ignore] // Requires a running tmux session
    fn test_tmux_clipboard() {
        if !inside_tmux() {
            return;
        }

        let text = "scopy clipboard test";
        Helper::Tmux.copy(text).expect("copy to tmux buffer");

        let output = Command::new("tmux")
            .arg("show-buffer")
            .output()
            .expect("tmux show-buffer");
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), text);
    }
}
