//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CollabRequestCommand, CollabRequestQuery, SkillCatalogue, UserRegistry,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub collab_commands: Arc<dyn CollabRequestCommand>,
    pub collab_queries: Arc<dyn CollabRequestQuery>,
    pub users: Arc<dyn UserRegistry>,
    pub skills: Arc<dyn SkillCatalogue>,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(
        collab_commands: Arc<dyn CollabRequestCommand>,
        collab_queries: Arc<dyn CollabRequestQuery>,
        users: Arc<dyn UserRegistry>,
        skills: Arc<dyn SkillCatalogue>,
    ) -> Self {
        Self {
            collab_commands,
            collab_queries,
            users,
            skills,
        }
    }
}
