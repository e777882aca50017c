//! Request handlers for the public endpoints.
//!
//! Each handler maps pipeline errors to exactly one externally observable
//! status + JSON body. Transient upstream failures surface as 5xx so
//! callers can distinguish "denied" from "try again".

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;

use crate::claim::ClaimError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::profile::ProfileError;

#[derive(Debug, Deserialize)]
pub struct ProfileImageParams {
    handle: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignedVoucherParams {
    wallet: Option<String>,
    handle: Option<String>,
}

/// `GET /profile-image?handle=<@handle>`
pub async fn get_profile_image(
    State(state): State<AppState>,
    Query(params): Query<ProfileImageParams>,
) -> Response {
    let start = Instant::now();

    let Some(handle) = params.handle else {
        return finish("profile_image", StatusCode::BAD_REQUEST, error_body("No handle provided"), start);
    };

    match state.resolver.resolve_image(&handle).await {
        Ok(url) => finish(
            "profile_image",
            StatusCode::OK,
            Json(json!({ "url": url.as_str() })).into_response(),
            start,
        ),
        Err(e) => {
            let (status, message) = match &e {
                ProfileError::InvalidHandle => (StatusCode::BAD_REQUEST, e.to_string()),
                ProfileError::FetchFailed | ProfileError::NotFound => {
                    (StatusCode::NOT_FOUND, e.to_string())
                }
                ProfileError::Upstream(_) => {
                    tracing::error!(error = %e, "Profile host unreachable");
                    (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
                }
            };
            finish("profile_image", status, error_body(&message), start)
        }
    }
}

/// `GET /signed-voucher?wallet=<address>&handle=<@handle>`
pub async fn get_signed_voucher(
    State(state): State<AppState>,
    Query(params): Query<SignedVoucherParams>,
) -> Response {
    let start = Instant::now();

    let (Some(wallet), Some(handle)) = (params.wallet, params.handle) else {
        return finish(
            "signed_voucher",
            StatusCode::BAD_REQUEST,
            error_body("Missing wallet or handle"),
            start,
        );
    };

    match state.claims.process(&wallet, &handle).await {
        Ok(signed) => {
            metrics::record_claim("approved");
            finish(
                "signed_voucher",
                StatusCode::OK,
                Json(signed).into_response(),
                start,
            )
        }
        Err(e) => {
            let (status, message) = claim_error_parts(&e);
            metrics::record_claim(claim_outcome(&e));
            if status.is_server_error() {
                tracing::error!(error = %e, "Claim failed");
            }
            finish("signed_voucher", status, error_body(&message), start)
        }
    }
}

/// `GET /health`
pub async fn get_health() -> Response {
    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

/// Map a claim error to its externally observable status and message.
fn claim_error_parts(err: &ClaimError) -> (StatusCode, String) {
    match err {
        ClaimError::InvalidAddress => (StatusCode::BAD_REQUEST, err.to_string()),
        // An empty handle reads the same as a missing parameter.
        ClaimError::InvalidHandle => {
            (StatusCode::BAD_REQUEST, "Missing wallet or handle".to_string())
        }
        ClaimError::NotEligible { .. } => (StatusCode::FORBIDDEN, "Not eligible".to_string()),
        ClaimError::AlreadyClaimed => (StatusCode::FORBIDDEN, "Already claimed".to_string()),
        ClaimError::ProfileNotFound => (StatusCode::BAD_REQUEST, "Invalid handle".to_string()),
        ClaimError::Upstream(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        ClaimError::Signing(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Voucher signing failed".to_string(),
        ),
    }
}

/// Metric label for a claim outcome.
fn claim_outcome(err: &ClaimError) -> &'static str {
    match err {
        ClaimError::InvalidAddress | ClaimError::InvalidHandle => "invalid_input",
        ClaimError::NotEligible { .. } => "not_eligible",
        ClaimError::AlreadyClaimed => "already_claimed",
        ClaimError::ProfileNotFound => "profile_not_found",
        ClaimError::Upstream(_) => "upstream_unavailable",
        ClaimError::Signing(_) => "signing_failure",
    }
}

fn error_body(message: &str) -> Response {
    Json(json!({ "error": message })).into_response()
}

fn finish(endpoint: &'static str, status: StatusCode, body: Response, start: Instant) -> Response {
    metrics::record_request(endpoint, status.as_u16(), start);
    let mut response = body;
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_error_status_mapping() {
        assert_eq!(
            claim_error_parts(&ClaimError::InvalidAddress).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            claim_error_parts(&ClaimError::NotEligible {
                observed: 10,
                threshold: 5000
            }),
            (StatusCode::FORBIDDEN, "Not eligible".to_string())
        );
        assert_eq!(
            claim_error_parts(&ClaimError::AlreadyClaimed),
            (StatusCode::FORBIDDEN, "Already claimed".to_string())
        );
        assert_eq!(
            claim_error_parts(&ClaimError::ProfileNotFound).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            claim_error_parts(&ClaimError::Upstream("rpc down".into())).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            claim_error_parts(&ClaimError::Signing("no key".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_signing_errors_are_not_echoed() {
        // The signing error text may reference key configuration; the
        // response body must stay generic.
        let (_, message) = claim_error_parts(&ClaimError::Signing(
            "Environment variable VOUCHER_SIGNER_PRIVATE_KEY not set".into(),
        ));
        assert_eq!(message, "Voucher signing failed");
    }
}
