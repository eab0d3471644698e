use axum::{
    routing::{get, post},
    Router,
};

pub mod payers;
pub mod points;
pub mod system;
pub mod transactions;

/// Router for all account-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/v1/points/add", post(points::add_points))
        .route("/v1/points/spend", post(points::spend_points))
        .route("/v1/payers", get(payers::list_payers))
        .route("/v1/payers/:payer", get(payers::get_payer))
        .route("/v1/transactions", get(transactions::list_transactions))
}
