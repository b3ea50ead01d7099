//! Server construction and wiring of ports to adapters.

mod config;

pub use config::{ConfigError, ServerConfig};

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::collab::CollabRequestService;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{collab_requests, skills, users};
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DbPool, DieselCollabRequestRepository, DieselSkillCatalogue, DieselUserRegistry, PoolConfig,
    run_pending_migrations,
};

/// Wire the database-backed adapters into the HTTP handler state.
fn build_http_state(pool: &DbPool) -> HttpState {
    let users_repo = Arc::new(DieselUserRegistry::new(pool.clone()));
    let skills_repo = Arc::new(DieselSkillCatalogue::new(pool.clone()));
    let requests_repo = Arc::new(DieselCollabRequestRepository::new(pool.clone()));
    let collab_service = Arc::new(CollabRequestService::new(
        requests_repo,
        users_repo.clone(),
        skills_repo.clone(),
    ));

    HttpState {
        collab_commands: collab_service.clone(),
        collab_queries: collab_service,
        users: users_repo,
        skills: skills_repo,
    }
}

/// Apply migrations, build the pool, and serve until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let applied = run_pending_migrations(config.database_url().to_owned())
        .await
        .map_err(std::io::Error::other)?;
    if applied > 0 {
        info!(applied, "schema migrations applied");
    }

    let pool_config =
        PoolConfig::new(config.database_url()).with_max_size(config.pool_max_size());
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;

    let state = web::Data::new(build_http_state(&pool));
    let health_state = web::Data::new(HealthState::new());
    let server_state = state.clone();
    let server_health = health_state.clone();

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(users::create_user)
            .service(users::get_user)
            .service(users::list_users)
            .service(skills::create_skill)
            .service(skills::get_skill)
            .service(skills::list_skills)
            .service(collab_requests::list_collab_requests)
            .service(collab_requests::get_collab_request)
            .service(collab_requests::create_collab_request)
            .service(collab_requests::set_collab_request_status)
            .service(collab_requests::reschedule_collab_request)
            .service(collab_requests::delete_collab_request);

        let app = App::new()
            .app_data(server_state.clone())
            .app_data(server_health.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        app
    })
    .bind(config.bind_addr())?;

    health_state.mark_ready();
    info!(addr = %config.bind_addr(), "listening");
    server.run().await
}
