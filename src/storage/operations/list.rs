use crate::error::Result;
use futures::stream::TryStreamExt;
use opendal::Operator;

/// Trait for enumerating object keys in a bucket.
pub trait Lister {
    /// List every key in the bucket, folder markers included.
    ///
    /// # Returns
    /// * `Result<Vec<String>>` - Keys relative to the bucket root
    async fn list_keys(&self) -> Result<Vec<String>>;
}

/// Implementation of Lister for an OpenDAL Operator scoped to one bucket.
pub struct OpenDalLister {
    operator: Operator,
}

impl OpenDalLister {
    /// Create a new lister with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Lister for OpenDalLister {
    async fn list_keys(&self) -> Result<Vec<String>> {
        let lister = self.operator.lister_with("/").recursive(true).await?;

        let keys: Vec<String> = lister
            .try_filter_map(|entry| async move {
                let path = entry.path().trim_start_matches('/');
                Ok((!path.is_empty()).then(|| path.to_string()))
            })
            .try_collect()
            .await?;
        Ok(keys)
    }
}
