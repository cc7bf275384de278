use crate::error::{Error, Result};
use crate::storage::StorageConfig;
use crate::storage::constants::DEFAULT_S3_REGION;
use crate::storage::utils::path::ensure_trailing_slash;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use futures::stream::TryStreamExt;
use opendal::Operator;

/// Result of a create-bucket request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateBucketOutcome {
    Created,
    /// A bucket with that name is already owned by the account; nothing was created.
    AlreadyExists,
}

/// Trait for account-level bucket management.
pub trait BucketManager {
    /// Names of all buckets owned by the account.
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// Create a bucket, reporting a name conflict as `AlreadyExists`.
    async fn create_bucket(&self, name: &str) -> Result<CreateBucketOutcome>;
}

/// Create `name` unless the account already lists a bucket by that name.
///
/// The listing and the creation are separate requests, so a concurrent creator
/// can still win the race; managers map the service's own conflict response
/// to `AlreadyExists` as well.
pub async fn create_bucket_checked<M: BucketManager>(
    manager: &M,
    name: &str,
) -> Result<CreateBucketOutcome> {
    let existing = manager.list_buckets().await?;
    if existing.iter().any(|b| b == name) {
        log::warn!("bucket {name} already exists, skipping creation");
        return Ok(CreateBucketOutcome::AlreadyExists);
    }
    manager.create_bucket(name).await
}

/// Bucket management through the AWS SDK, for S3 and S3-compatible services.
#[derive(Clone)]
pub struct S3BucketManager {
    client: S3Client,
    region: Option<String>,
}

impl S3BucketManager {
    pub async fn new(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let (Some(access_key_id), Some(secret)) =
            (&config.access_key_id, &config.access_key_secret)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret,
                None,
                None,
                "bucketry",
            ));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        Self {
            client: S3Client::from_conf(builder.build()),
            region: sdk_config.region().map(|r| r.to_string()),
        }
    }
}

impl BucketManager for S3BucketManager {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| Error::BucketService {
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn create_bucket(&self, name: &str) -> Result<CreateBucketOutcome> {
        let mut request = self.client.create_bucket().bucket(name);
        // us-east-1 rejects an explicit location constraint
        if let Some(region) = self.region.as_deref().filter(|r| *r != DEFAULT_S3_REGION) {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(CreateBucketOutcome::Created),
            Err(err) => match err.as_service_error() {
                Some(e) if e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists() => {
                    Ok(CreateBucketOutcome::AlreadyExists)
                }
                // Transport failures have no service error; keep the whole source chain.
                _ => Err(Error::BucketService {
                    message: DisplayErrorContext(&err).to_string(),
                }),
            },
        }
    }
}

/// Bucket management for the local filesystem provider.
/// Every top-level directory under the root is a bucket.
#[derive(Clone)]
pub struct FsBucketManager {
    operator: Operator,
}

impl FsBucketManager {
    pub fn new(root: &str) -> Result<Self> {
        let builder = opendal::services::Fs::default().root(root);
        Ok(Self {
            operator: Operator::new(builder)?.finish(),
        })
    }
}

impl BucketManager for FsBucketManager {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let entries: Vec<_> = self.operator.lister("/").await?.try_collect().await?;

        let mut names: Vec<String> = entries
            .iter()
            .filter(|e| e.metadata().mode().is_dir())
            .map(|e| e.path().trim_matches('/').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn create_bucket(&self, name: &str) -> Result<CreateBucketOutcome> {
        let path = ensure_trailing_slash(name.trim_matches('/'));
        if self.operator.exists(&path).await? {
            return Ok(CreateBucketOutcome::AlreadyExists);
        }
        self.operator.create_dir(&path).await?;
        Ok(CreateBucketOutcome::Created)
    }
}
