use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AccountContext;

/// Record an earn or manual adjustment. Responds 204 on success.
pub async fn add_points(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(account): Extension<AccountContext>,
    Json(body): Json<dto::AddPointsRequest>,
) -> axum::response::Response {
    match services
        .engine
        .earn(account.account_id(), body.into_transaction())
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

/// Redeem points oldest-first; responds with the settlement transactions.
pub async fn spend_points(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(account): Extension<AccountContext>,
    Json(body): Json<dto::SpendPointsRequest>,
) -> axum::response::Response {
    match services.engine.spend(account.account_id(), body.points) {
        Ok(settlement) => (StatusCode::OK, Json(settlement)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}
