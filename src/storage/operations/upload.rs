use crate::error::{NotAFileSnafu, PathNotFoundSnafu, Result};
use crate::storage::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_CONCURRENCY};
use crate::storage::utils::progress::ProgressSink;
use opendal::Operator;
use snafu::ensure;
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncReadExt, BufReader};

/// Trait for uploading local files to storage.
pub trait Uploader {
    /// Upload a single local file to `key`, reporting every chunk to `sink`.
    ///
    /// A chunk is reported once the writer has accepted it. The writer keeps up
    /// to `DEFAULT_CONCURRENCY` parts in flight (at least 5 MiB each on S3), so
    /// the reported total can run that far ahead of the network. It catches up
    /// on `close`, which returns only after every part is committed.
    ///
    /// # Arguments
    /// * `local_path` - Source file on local filesystem
    /// * `key` - Destination object key in the bucket
    /// * `sink` - Receives the size of each chunk handed to the writer
    ///
    /// # Returns
    /// * `Result<u64>` - Number of bytes uploaded
    async fn upload_file<S: ProgressSink>(
        &self,
        local_path: &Path,
        key: &str,
        sink: &S,
    ) -> Result<u64>;
}

/// Implementation of Uploader for an OpenDAL Operator scoped to one bucket.
pub struct OpenDalUploader {
    operator: Operator,
}

impl OpenDalUploader {
    /// Create a new uploader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Uploader for OpenDalUploader {
    async fn upload_file<S: ProgressSink>(
        &self,
        local_path: &Path,
        key: &str,
        sink: &S,
    ) -> Result<u64> {
        ensure!(
            local_path.exists(),
            PathNotFoundSnafu {
                path: local_path.to_path_buf()
            }
        );
        ensure!(
            local_path.is_file(),
            NotAFileSnafu {
                path: local_path.to_path_buf()
            }
        );

        let file = fs::File::open(local_path).await?;
        let file_size = file.metadata().await?.len();
        let mut reader = BufReader::new(file);
        let mut buffer = vec![0u8; DEFAULT_CHUNK_SIZE];
        let mut total_bytes = 0u64;
        let mut writer = self
            .operator
            .writer_with(key)
            .chunk(DEFAULT_CHUNK_SIZE)
            .concurrent(DEFAULT_CONCURRENCY)
            .await?;

        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            writer.write(buffer[..bytes_read].to_vec()).await?;
            total_bytes += bytes_read as u64;
            sink.report(bytes_read as u64);
        }
        writer.close().await?;

        if file_size == 0 {
            sink.report(0);
        }
        log::debug!("uploaded {} to {key} ({total_bytes} bytes)", local_path.display());
        Ok(total_bytes)
    }
}
