use async_trait::async_trait;
use crate::error::BackendError;
use super::{
    CatalogEntries,
    CatalogKind,
};

#[async_trait]
pub trait CatalogBackend {
    async fn add_catalog_entry(
        &self,
        kind: CatalogKind,
        name: &str,
        code: Option<&str>,
    ) -> Result<i64, BackendError>;
    async fn list_catalog_entries(
        &self,
        kind: CatalogKind,
    ) -> Result<CatalogEntries, BackendError>;
    /// Returns the ids from the provided list that exist for the kind.
    async fn existing_catalog_ids(
        &self,
        kind: CatalogKind,
        ids: &[i64],
    ) -> Result<Vec<i64>, BackendError>;
}
