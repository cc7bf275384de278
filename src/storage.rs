use crate::error::{BucketNotFoundSnafu, Error, Result};
use opendal::Operator;
use snafu::ensure;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod constants;
mod operations;
mod utils;

use self::constants::DEFAULT_FS_ROOT;
use self::operations::bucket::{FsBucketManager, S3BucketManager, create_bucket_checked};
use self::operations::download::OpenDalDownloader;
use self::operations::list::OpenDalLister;
use self::operations::upload::OpenDalUploader;
use self::operations::{BucketManager, Downloader, Lister, Uploader};
use self::utils::path::{basename, files_in_folder, folder_markers, object_key};
use crate::wrap_err;

pub use self::operations::bucket::CreateBucketOutcome;
pub use self::utils::progress::{ProgressSink, TransferDirection, TransferProgress};

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    S3,
    Fs,
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "s3" | "minio" => Ok(Self::S3),
            "fs" => Ok(Self::Fs),
            _ => Err(Error::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Account-level storage configuration. Buckets are chosen per operation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub root_path: Option<String>,
    pub force_path_style: bool,
}

impl StorageConfig {
    /// Missing keys fall back to the SDK's default credential chain.
    pub fn s3(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::S3,
            access_key_id,
            access_key_secret: secret_access_key,
            endpoint: None,
            region,
            root_path: None,
            force_path_style: false,
        }
    }

    /// S3-compatible service at `endpoint`, addressed path-style.
    pub fn minio(
        endpoint: String,
        access_key_id: String,
        secret_access_key: String,
        region: Option<String>,
    ) -> Self {
        Self {
            provider: StorageProvider::S3,
            access_key_id: Some(access_key_id),
            access_key_secret: Some(secret_access_key),
            endpoint: Some(endpoint),
            region,
            root_path: None,
            force_path_style: true,
        }
    }

    pub fn fs(root_path: String) -> Self {
        Self {
            provider: StorageProvider::Fs,
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: Some(root_path),
            force_path_style: false,
        }
    }

    fn fs_root(&self) -> &str {
        self.root_path.as_deref().unwrap_or(DEFAULT_FS_ROOT)
    }
}

#[derive(Clone)]
enum BucketBackend {
    S3(S3BucketManager),
    Fs(FsBucketManager),
}

impl BucketManager for BucketBackend {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        match self {
            BucketBackend::S3(manager) => manager.list_buckets().await,
            BucketBackend::Fs(manager) => manager.list_buckets().await,
        }
    }

    async fn create_bucket(&self, name: &str) -> Result<CreateBucketOutcome> {
        match self {
            BucketBackend::S3(manager) => manager.create_bucket(name).await,
            BucketBackend::Fs(manager) => manager.create_bucket(name).await,
        }
    }
}

/// Storage client: bucket management plus per-bucket object transfers
#[derive(Clone)]
pub struct StorageClient {
    config: StorageConfig,
    buckets: BucketBackend,
}

impl StorageClient {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let buckets = match config.provider {
            StorageProvider::S3 => BucketBackend::S3(S3BucketManager::new(&config).await),
            StorageProvider::Fs => BucketBackend::Fs(FsBucketManager::new(config.fs_root())?),
        };
        Ok(Self { config, buckets })
    }

    pub fn provider(&self) -> StorageProvider {
        self.config.provider
    }

    /// Build an OpenDAL operator scoped to `bucket`.
    ///
    /// For the fs provider the bucket directory must already exist.
    pub fn operator(&self, bucket: &str) -> Result<Operator> {
        let config = &self.config;
        match config.provider {
            StorageProvider::S3 => {
                let mut builder = opendal::services::S3::default().bucket(bucket);
                if let Some(access_key_id) = &config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(secret_access_key) = &config.access_key_secret {
                    builder = builder.secret_access_key(secret_access_key);
                }
                if let Some(region) = &config.region {
                    builder = builder.region(region);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::Fs => {
                let root = Path::new(config.fs_root()).join(bucket);
                // OpenDAL's fs backend creates a missing root on build
                ensure!(
                    !bucket.trim_matches('/').is_empty() && root.is_dir(),
                    BucketNotFoundSnafu { bucket }
                );
                let builder = opendal::services::Fs::default().root(&root.to_string_lossy());
                Ok(Operator::new(builder)?.finish())
            }
        }
    }

    pub async fn list_buckets(&self) -> Result<Vec<String>> {
        log::debug!("list_buckets provider={:?}", self.config.provider);
        wrap_err!(self.buckets.list_buckets().await, ListBucketsFailed {})
    }

    /// Create `name` unless it already exists. A conflict is an outcome, not an error.
    pub async fn create_bucket(&self, name: &str) -> Result<CreateBucketOutcome> {
        log::debug!(
            "create_bucket provider={:?} name={}",
            self.config.provider,
            name
        );
        wrap_err!(
            create_bucket_checked(&self.buckets, name).await,
            CreateBucketFailed {
                bucket: name.to_string()
            }
        )
    }

    /// Every key in `bucket`, folder markers included.
    pub async fn list_keys(&self, bucket: &str) -> Result<Vec<String>> {
        log::debug!(
            "list_keys provider={:?} bucket={}",
            self.config.provider,
            bucket
        );
        let listed = async { OpenDalLister::new(self.operator(bucket)?).list_keys().await };
        wrap_err!(
            listed.await,
            ListObjectsFailed {
                bucket: bucket.to_string()
            }
        )
    }

    /// Folder markers in `bucket`.
    pub async fn list_folders(&self, bucket: &str) -> Result<Vec<String>> {
        let keys = self.list_keys(bucket).await?;
        Ok(folder_markers(&keys))
    }

    /// Names of the files directly inside `folder`, or at bucket root when `None`.
    pub async fn list_files(&self, bucket: &str, folder: Option<&str>) -> Result<Vec<String>> {
        let keys = self.list_keys(bucket).await?;
        Ok(files_in_folder(&keys, folder))
    }

    /// Upload each file to `folder/<file name>` in `bucket`, one tracker per file.
    ///
    /// Stops at the first failure. Returns the keys written.
    pub async fn upload_files<P: AsRef<Path>>(
        &self,
        bucket: &str,
        local_paths: &[P],
        folder: &str,
    ) -> Result<Vec<String>> {
        let operator = self.operator(bucket)?;
        let uploader = OpenDalUploader::new(operator);
        let total_files = local_paths.len();
        let mut keys = Vec::with_capacity(total_files);

        for (index, local_path) in local_paths.iter().enumerate() {
            let local_path = local_path.as_ref();
            let key = object_key(folder, &basename(&local_path.to_string_lossy()));
            log::debug!(
                "upload_file provider={:?} local_path={} bucket={} key={}",
                self.config.provider,
                local_path.display(),
                bucket,
                key
            );
            println!("\n{} / {}:", index + 1, total_files);

            let uploaded = async {
                let progress = TransferProgress::for_upload(local_path)?;
                let bytes = uploader.upload_file(local_path, &key, &progress).await;
                progress.finish();
                bytes
            };
            let bytes = wrap_err!(
                uploaded.await,
                UploadFailed {
                    local_path: local_path.display().to_string(),
                    bucket: bucket.to_string(),
                    key: key.clone()
                }
            )?;
            println!(
                "✅ Upload: {} → {bucket}/{key} ({bytes} bytes)",
                local_path.display()
            );
            keys.push(key);
        }
        Ok(keys)
    }

    /// Download `bucket/key` to `local_path`, sizing progress from the remote object.
    pub async fn download_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
    ) -> Result<PathBuf> {
        log::debug!(
            "download_file provider={:?} bucket={} key={} local_path={}",
            self.config.provider,
            bucket,
            key,
            local_path.display()
        );
        let downloaded = async {
            let downloader = OpenDalDownloader::new(self.operator(bucket)?);
            let size = downloader.object_size(key).await?;
            let progress = TransferProgress::new(key, size, TransferDirection::Download);
            let target = downloader
                .download_file(key, progress.total_bytes(), local_path, &progress)
                .await;
            progress.finish();
            target
        };
        let target = wrap_err!(
            downloaded.await,
            DownloadFailed {
                bucket: bucket.to_string(),
                key: key.to_string(),
                local_path: local_path.display().to_string()
            }
        )?;
        println!("✅ Download: {bucket}/{key} → {}", target.display());
        Ok(target)
    }
}
