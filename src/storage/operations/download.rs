use crate::error::{Error, IncompleteReadSnafu, Result};
use crate::storage::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_CONCURRENCY};
use crate::storage::utils::path::basename;
use crate::storage::utils::progress::ProgressSink;
use futures::stream::{self, StreamExt, TryStreamExt};
use opendal::Operator;
use snafu::ensure;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Trait for downloading objects from storage.
pub trait Downloader {
    /// Size of the remote object as reported by the storage service.
    async fn object_size(&self, key: &str) -> Result<u64>;

    /// Download the first `size` bytes of `key` to `local_path`, reporting every chunk to `sink`.
    ///
    /// `size` is the total the caller sized its progress with, normally from
    /// [`Downloader::object_size`]. If `local_path` is an existing directory the
    /// object is written inside it under its base name. Data lands in a
    /// `.part` sibling that replaces the target only once every chunk arrived,
    /// so a failed transfer leaves an existing target untouched.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - The file that was written
    async fn download_file<S: ProgressSink>(
        &self,
        key: &str,
        size: u64,
        local_path: &Path,
        sink: &S,
    ) -> Result<PathBuf>;
}

/// Implementation of Downloader for an OpenDAL Operator scoped to one bucket.
pub struct OpenDalDownloader {
    operator: Operator,
}

impl OpenDalDownloader {
    /// Create a new downloader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

/// Split `0..size` into consecutive ranges of at most `chunk` bytes.
fn chunk_ranges(size: u64, chunk: u64) -> Vec<Range<u64>> {
    (0..size)
        .step_by(chunk as usize)
        .map(|start| start..(start + chunk).min(size))
        .collect()
}

impl Downloader for OpenDalDownloader {
    async fn object_size(&self, key: &str) -> Result<u64> {
        Ok(self.operator.stat(key).await?.content_length())
    }

    async fn download_file<S: ProgressSink>(
        &self,
        key: &str,
        size: u64,
        local_path: &Path,
        sink: &S,
    ) -> Result<PathBuf> {
        let target = if local_path.is_dir() {
            local_path.join(basename(key))
        } else {
            local_path.to_path_buf()
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        let partial = partial_path(&target);

        match self.fetch_into(key, size, &partial, sink).await {
            Ok(()) => fs::rename(&partial, &target).await?,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        }

        if size == 0 {
            sink.report(0);
        }
        log::debug!("downloaded {key} to {} ({size} bytes)", target.display());
        Ok(target)
    }
}

impl OpenDalDownloader {
    async fn fetch_into<S: ProgressSink>(
        &self,
        key: &str,
        size: u64,
        path: &Path,
        sink: &S,
    ) -> Result<()> {
        let mut file = fs::File::create(path).await?;

        // Chunks are fetched concurrently and may complete out of order;
        // `buffered` hands them back in file order for writing.
        let operator = &self.operator;
        let mut chunks = stream::iter(chunk_ranges(size, DEFAULT_CHUNK_SIZE as u64))
            .map(|range| async move {
                let expected = range.end - range.start;
                let buffer = operator.read_with(key).range(range).await?;
                let actual = buffer.len() as u64;
                ensure!(
                    actual == expected,
                    IncompleteReadSnafu {
                        key,
                        expected,
                        actual
                    }
                );
                sink.report(actual);
                Ok::<_, Error>(buffer)
            })
            .buffered(DEFAULT_CONCURRENCY);

        while let Some(buffer) = chunks.try_next().await? {
            file.write_all(&buffer.to_bytes()).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

/// `dir/name` becomes `dir/.name.part`.
fn partial_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.part"))
}
