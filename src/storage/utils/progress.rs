use crate::error::{NotAFileSnafu, PathNotFoundSnafu, Result};
use snafu::ensure;
use std::fmt;
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Receives chunk-completion notifications while a transfer is running.
///
/// The transfer engine may call `report` from any task or thread, possibly
/// concurrently for different chunks of the same object.
pub trait ProgressSink: Send + Sync {
    /// Record that `bytes_amount` more bytes were moved (not cumulative).
    fn report(&self, bytes_amount: u64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    Upload,
    Download,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferDirection::Upload => write!(f, "Uploading"),
            TransferDirection::Download => write!(f, "Downloading"),
        }
    }
}

struct ProgressState<W> {
    transferred_bytes: u64,
    out: W,
}

/// Per-transfer progress tracker that redraws a single console line.
///
/// One instance tracks exactly one object. The running byte count and the
/// output writer live behind the same lock, so a redraw always reflects a
/// complete update.
pub struct TransferProgress<W = Stdout> {
    label: String,
    total_bytes: u64,
    direction: TransferDirection,
    state: Mutex<ProgressState<W>>,
}

impl TransferProgress<Stdout> {
    pub fn new(label: impl Into<String>, total_bytes: u64, direction: TransferDirection) -> Self {
        Self::with_writer(label, total_bytes, direction, io::stdout())
    }

    /// Build an upload tracker sized from the local file.
    pub fn for_upload(path: &Path) -> Result<Self> {
        ensure!(
            path.exists(),
            PathNotFoundSnafu {
                path: path.to_path_buf()
            }
        );
        let metadata = std::fs::metadata(path)?;
        ensure!(
            metadata.is_file(),
            NotAFileSnafu {
                path: path.to_path_buf()
            }
        );
        Ok(Self::new(
            path.display().to_string(),
            metadata.len(),
            TransferDirection::Upload,
        ))
    }
}

impl<W: Write + Send> TransferProgress<W> {
    pub fn with_writer(
        label: impl Into<String>,
        total_bytes: u64,
        direction: TransferDirection,
        out: W,
    ) -> Self {
        Self {
            label: label.into(),
            total_bytes,
            direction,
            state: Mutex::new(ProgressState {
                transferred_bytes: 0,
                out,
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn transferred_bytes(&self) -> u64 {
        self.lock().transferred_bytes
    }

    /// Percentage of `total_bytes` seen so far. An empty object counts as complete.
    pub fn percent_complete(&self) -> f64 {
        percent(self.lock().transferred_bytes, self.total_bytes)
    }

    /// End the in-place progress line.
    pub fn finish(&self) {
        let mut state = self.lock();
        if let Err(e) = writeln!(state.out).and_then(|_| state.out.flush()) {
            log::debug!("progress output for {} failed: {e}", self.label);
        }
    }

    /// Consume the tracker and hand back the writer.
    pub fn into_writer(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .out
    }

    // A panic while holding the lock leaves the counter intact, so keep going.
    fn lock(&self) -> MutexGuard<'_, ProgressState<W>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> ProgressSink for TransferProgress<W> {
    fn report(&self, bytes_amount: u64) {
        let mut state = self.lock();
        state.transferred_bytes = state.transferred_bytes.saturating_add(bytes_amount);
        let seen = state.transferred_bytes;
        let line = format!(
            "\r{}: {} {:.2} mb / {:.2} mb (Progress: {:.2}%, Speed: {:.2} kb)",
            self.direction,
            self.label,
            seen as f64 / 1_000_000.0,
            self.total_bytes as f64 / 1_000_000.0,
            percent(seen, self.total_bytes),
            bytes_amount as f64 / 1000.0,
        );
        if let Err(e) = state
            .out
            .write_all(line.as_bytes())
            .and_then(|_| state.out.flush())
        {
            log::debug!("progress output for {} failed: {e}", self.label);
        }
    }
}

fn percent(seen: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (seen as f64 / total as f64) * 100.0
}
