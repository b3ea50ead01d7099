//! Domain ports and supporting types for the hexagonal boundary.

mod collab_request_command;
mod collab_request_query;
mod collab_request_repository;
mod page;
mod skill_catalogue;
mod user_registry;

#[cfg(test)]
pub use collab_request_command::MockCollabRequestCommand;
pub use collab_request_command::{
    CollabRequestCommand, CollabRequestPayload, CreateCollabRequest, DeleteCollabRequest,
    RescheduleRequest, SetStatusRequest,
};
#[cfg(test)]
pub use collab_request_query::MockCollabRequestQuery;
pub use collab_request_query::{CollabRequestQuery, ListCollabRequests};
#[cfg(test)]
pub use collab_request_repository::MockCollabRequestRepository;
pub use collab_request_repository::{
    CollabRequestFilter, CollabRequestRepository, CollabRequestRepositoryError,
};
pub use page::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page, PageValidationError};
#[cfg(test)]
pub use skill_catalogue::MockSkillCatalogue;
pub use skill_catalogue::{SkillCatalogue, SkillCatalogueError, SkillSearch};
#[cfg(test)]
pub use user_registry::MockUserRegistry;
pub use user_registry::{UserRegistry, UserRegistryError};
