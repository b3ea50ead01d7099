//! Driving port for collaboration request reads.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::collab::RequestId;

use super::{CollabRequestFilter, CollabRequestPayload, Page};

/// Listing input: filter plus pagination window.
#[derive(Debug, Clone)]
pub struct ListCollabRequests {
    pub filter: CollabRequestFilter,
    pub page: Page,
}

/// Domain use-case port for reading collaboration requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollabRequestQuery: Send + Sync {
    /// Point lookup by id.
    async fn get_request(&self, request_id: RequestId) -> Result<CollabRequestPayload, Error>;

    /// Filtered listing ordered by creation time descending.
    async fn list_requests(
        &self,
        request: ListCollabRequests,
    ) -> Result<Vec<CollabRequestPayload>, Error>;
}
