use crate::utils::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Source of the users payload served by `GET /v1/users`.
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Returns the upstream body verbatim. Implementations must stop work
    /// and return `UsersError::Cancelled` once `cancel` fires.
    async fn get_users(&self, cancel: &CancellationToken) -> Result<String>;
}
