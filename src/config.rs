use crate::error::{MissingEnvVarSnafu, Result};
use crate::storage::constants::{DEFAULT_FS_ROOT, DEFAULT_MINIO_ENDPOINT, DEFAULT_S3_REGION};
use crate::storage::{StorageConfig, StorageProvider};
use snafu::OptionExt;
use std::env;
use std::str::FromStr;

// First set variable among `keys`.
fn first_env_var(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env::var(key).ok())
}

fn required_env_var(keys: &[&str]) -> Result<String> {
    first_env_var(keys).context(MissingEnvVarSnafu {
        key: keys.join(" or "),
    })
}

/// Load storage configuration from environment variables
pub fn load_storage_config() -> Result<StorageConfig> {
    let provider_str = env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "s3".to_string());
    let provider = StorageProvider::from_str(&provider_str)?;

    match provider {
        StorageProvider::S3 if provider_str.eq_ignore_ascii_case("minio") => load_minio_config(),
        StorageProvider::S3 => Ok(load_s3_config()),
        StorageProvider::Fs => Ok(load_fs_config()),
    }
}

fn configured_region() -> Option<String> {
    first_env_var(&["STORAGE_REGION", "AWS_DEFAULT_REGION", "AWS_REGION"])
}

/// Load S3 (AWS) configuration. Keys are optional; without them the SDK
/// resolves credentials on its own.
fn load_s3_config() -> StorageConfig {
    let access_key_id = first_env_var(&["STORAGE_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"]);
    let secret_access_key =
        first_env_var(&["STORAGE_ACCESS_KEY_SECRET", "AWS_SECRET_ACCESS_KEY"]);

    let mut config = StorageConfig::s3(access_key_id, secret_access_key, configured_region());
    config.endpoint = env::var("STORAGE_ENDPOINT").ok();
    config
}

/// Load MinIO configuration
fn load_minio_config() -> Result<StorageConfig> {
    let access_key_id = required_env_var(&["STORAGE_ACCESS_KEY_ID", "MINIO_ACCESS_KEY"])?;
    let secret_access_key =
        required_env_var(&["STORAGE_ACCESS_KEY_SECRET", "MINIO_SECRET_KEY"])?;
    let endpoint = first_env_var(&["STORAGE_ENDPOINT", "MINIO_ENDPOINT"])
        .unwrap_or_else(|| DEFAULT_MINIO_ENDPOINT.to_string());
    let region = configured_region()
        .or_else(|| env::var("MINIO_DEFAULT_REGION").ok())
        .unwrap_or_else(|| DEFAULT_S3_REGION.to_string());

    Ok(StorageConfig::minio(
        endpoint,
        access_key_id,
        secret_access_key,
        Some(region),
    ))
}

/// Load filesystem configuration (for testing)
fn load_fs_config() -> StorageConfig {
    let root_path = env::var("STORAGE_ROOT_PATH").unwrap_or_else(|_| DEFAULT_FS_ROOT.to_string());
    StorageConfig::fs(root_path)
}
