use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Environment variable '{key}' is required but not found"))]
    MissingEnvVar { key: String },

    #[snafu(display("Unsupported storage provider: {provider}"))]
    UnsupportedProvider { provider: String },

    #[snafu(display("Path does not exist: {}", path.display()))]
    PathNotFound { path: PathBuf },

    #[snafu(display("Not a regular file: {}", path.display()))]
    NotAFile { path: PathBuf },

    #[snafu(display("Bucket does not exist: {bucket}"))]
    BucketNotFound { bucket: String },

    #[snafu(display("Short read of '{key}': expected {expected} bytes, got {actual}"))]
    IncompleteRead {
        key: String,
        expected: u64,
        actual: u64,
    },

    #[snafu(display("Storage service error: {message}"))]
    BucketService { message: String },

    #[snafu(display("Failed to list buckets: {source}"))]
    ListBucketsFailed { source: Box<Error> },

    #[snafu(display("Failed to create bucket '{bucket}': {source}"))]
    CreateBucketFailed { bucket: String, source: Box<Error> },

    #[snafu(display("Failed to list objects in bucket '{bucket}': {source}"))]
    ListObjectsFailed { bucket: String, source: Box<Error> },

    #[snafu(display("Failed to download '{bucket}/{key}' to '{local_path}': {source}"))]
    DownloadFailed {
        bucket: String,
        key: String,
        local_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to upload '{local_path}' to '{bucket}/{key}': {source}"))]
    UploadFailed {
        local_path: String,
        bucket: String,
        key: String,
        source: Box<Error>,
    },

    #[snafu(display("OpenDAL error: {source}"))]
    OpenDal { source: opendal::Error },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::OpenDal { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}
