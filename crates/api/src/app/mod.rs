//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (ledger + spend engine)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use rewards_infra::Config;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &Config) -> Router {
    let services = Arc::new(services::build_services());
    let account_state = middleware::AccountState {
        default_account: config.default_account.clone(),
    };

    // Points routes: require an account context.
    let scoped = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            account_state,
            middleware::account_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(scoped)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::log_requests)))
}
