//! PostgreSQL persistence adapters built on Diesel.
//!
//! Everything Diesel-specific lives here: the connection pool, table
//! definitions, row structs, and the repository implementations of the
//! domain's driven ports. Mutating methods pair the row change with its
//! audit append inside one transaction.

mod audit;
mod diesel_collab_request_repository;
mod diesel_skill_catalogue;
mod diesel_user_registry;
mod error_mapping;
mod migrations;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_collab_request_repository::DieselCollabRequestRepository;
pub use diesel_skill_catalogue::DieselSkillCatalogue;
pub use diesel_user_registry::DieselUserRegistry;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
