// Error conversion helpers and wrapping macro for Snafu-based errors.
// `wrap_err!` serves the boxed-context variants of `crate::error::Error`:
// `ListBucketsFailed`, `CreateBucketFailed`, `ListObjectsFailed`, `UploadFailed`
// and `DownloadFailed`. Variants with no context fields are accepted too.
use crate::error::Error;

/// Convert different error types into our unified Error type.
pub trait IntoBucketryError {
    fn into_error(self) -> Error;
}

impl IntoBucketryError for Error {
    fn into_error(self) -> Error {
        self
    }
}

impl IntoBucketryError for opendal::Error {
    fn into_error(self) -> Error {
        self.into()
    }
}

impl IntoBucketryError for std::io::Error {
    fn into_error(self) -> Error {
        self.into()
    }
}

/// Macro to wrap a Result-producing expression into a Snafu variant with `source: Box<Error>`.
/// Example:
/// wrap_err!(op.await, UploadFailed { local_path: lp, bucket: b, key: k })?
#[macro_export]
macro_rules! wrap_err {
    ($expr:expr, $variant:ident { $($field:ident : $value:expr),* $(,)? }) => {{
        $expr.map_err(|e| {
            let src: $crate::error::Error = $crate::storage::utils::error::IntoBucketryError::into_error(e);
            $crate::error::Error::$variant { $($field: $value,)* source: Box::new(src) }
        })
    }};
}
