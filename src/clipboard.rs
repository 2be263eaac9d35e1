//! Clipboard seam for the copy action.
//!
//! The catalog core only depends on the [`Clipboard`] capability; whether the
//! write lands on a real clipboard is a host concern. [`SystemClipboard`] walks
//! the usual external tool chain (pbcopy, wl-copy, xclip, xsel) and pipes the
//! text to the first one present.

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard tool available on this host")]
    Unavailable,
    #[error("clipboard tool {tool} exited with {status}")]
    ToolFailed {
        tool: &'static str,
        status: ExitStatus,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Write-only clipboard capability. Implementations may fail; callers must not
/// assume the write succeeded.
pub trait Clipboard {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Candidate tools in preference order: macOS first, then Wayland, then X11.
const TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for SystemClipboard {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        for &(tool, args) in TOOLS {
            let spawned = Command::new(tool)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let mut child = match spawned {
                Ok(child) => child,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            // Close stdin so the tool sees EOF and flushes.
            drop(child.stdin.take());
            let status = child.wait()?;
            if status.success() {
                debug!(tool, bytes = text.len(), "clipboard write succeeded");
                return Ok(());
            }
            return Err(ClipboardError::ToolFailed { tool, status });
        }
        Err(ClipboardError::Unavailable)
    }
}

/// In-process clipboard for tests and embedding hosts without a system
/// clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Vec<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.push(text.to_string());
        Ok(())
    }
}
