// Transfer related constants
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
// Number of parts kept in flight by a single transfer
pub const DEFAULT_CONCURRENCY: usize = 4;

// Defaults
pub const DEFAULT_FS_ROOT: &str = "./storage";
pub const DEFAULT_MINIO_ENDPOINT: &str = "http://localhost:9000";
pub const DEFAULT_S3_REGION: &str = "us-east-1";
