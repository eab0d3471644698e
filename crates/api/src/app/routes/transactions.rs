use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::AccountContext;

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(account): Extension<AccountContext>,
) -> axum::response::Response {
    match services.engine.transactions(account.account_id()) {
        Ok(log) => (StatusCode::OK, Json(log)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}
