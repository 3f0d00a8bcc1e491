use async_trait::async_trait;

use super::RepositoryError;

/// Readiness probe for the document store, used by the health endpoint.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), RepositoryError>;
}
