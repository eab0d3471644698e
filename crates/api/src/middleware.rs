use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use rewards_core::AccountId;

use crate::app::errors;
use crate::context::AccountContext;

/// Header selecting the account a request operates on.
pub const ACCOUNT_HEADER: &str = "x-account-id";

#[derive(Clone)]
pub struct AccountState {
    pub default_account: AccountId,
}

/// Resolve the request's account and expose it as an `AccountContext` extension.
///
/// Requests without the header use the configured default account; a header
/// that is present but blank or not valid UTF-8 is rejected with 400.
pub async fn account_middleware(
    State(state): State<AccountState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let account_id = match extract_account(req.headers())? {
        Some(id) => id,
        None => state.default_account.clone(),
    };

    req.extensions_mut().insert(AccountContext::new(account_id));

    Ok(next.run(req).await)
}

fn extract_account(headers: &HeaderMap) -> Result<Option<AccountId>, Response> {
    let Some(header) = headers.get(ACCOUNT_HEADER) else {
        return Ok(None);
    };

    let raw = header.to_str().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_account", "account id must be valid UTF-8")
    })?;

    AccountId::new(raw)
        .map(Some)
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_account", e.to_string()))
}

/// Log method, path, status and latency of every request.
pub async fn log_requests(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
