// Storage operation traits and implementations
pub mod bucket;
pub mod download;
pub mod list;
pub mod upload;

pub use bucket::BucketManager;
pub use download::Downloader;
pub use list::Lister;
pub use upload::Uploader;
