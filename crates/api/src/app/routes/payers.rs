use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use rewards_ledger::PayerBalance;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::AccountContext;

pub async fn list_payers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(account): Extension<AccountContext>,
) -> axum::response::Response {
    match services.engine.balances(account.account_id()) {
        Ok(balances) => (StatusCode::OK, Json(balances)).into_response(),
        Err(e) => errors::engine_error_to_response(e),
    }
}

pub async fn get_payer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(account): Extension<AccountContext>,
    Path(payer): Path<String>,
) -> axum::response::Response {
    match services.engine.balance(account.account_id(), &payer) {
        Ok(Some(points)) => (StatusCode::OK, Json(PayerBalance { payer, points })).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "payer not found"),
        Err(e) => errors::engine_error_to_response(e),
    }
}
