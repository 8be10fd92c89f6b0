use post_votes_shared::types::PostRecord;
use crate::errors::PostCatalogError;

/// Read access to the post metadata owned by the post CRUD flow.
///
/// Only used to rebuild the ranking ledger after a restart.
#[async_trait::async_trait]
pub trait PostCatalog: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, PostCatalogError>;
}
