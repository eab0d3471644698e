use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use rewards_infra::{EngineError, LedgerStoreError};

pub fn engine_error_to_response(err: EngineError) -> axum::response::Response {
    match err {
        EngineError::InvalidArgument(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        e @ EngineError::InsufficientBalance { .. } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_balance",
            e.to_string(),
        ),
        EngineError::Storage(e @ LedgerStoreError::Inconsistent(_)) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ledger_inconsistent",
            e.to_string(),
        ),
        EngineError::Storage(e) => json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_unavailable",
            e.to_string(),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_distinct_statuses() {
        let cases = [
            (EngineError::InvalidArgument("bad".into()), StatusCode::BAD_REQUEST),
            (
                EngineError::InsufficientBalance { requested: 10, available: 5 },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                EngineError::Storage(LedgerStoreError::Unavailable("down".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                EngineError::Storage(LedgerStoreError::Inconsistent("overflow".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(engine_error_to_response(err).status(), status);
        }
    }
}
