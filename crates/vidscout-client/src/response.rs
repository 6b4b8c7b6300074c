//! Shared handling of Google API responses.

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use vidscout_core::AppError;

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorReason>,
}

#[derive(Deserialize)]
struct ErrorReason {
    #[serde(default)]
    reason: Option<String>,
}

/// Map a reqwest send failure onto the error taxonomy.
pub(crate) fn send_error(e: reqwest::Error, timeout_secs: u64) -> AppError {
    if e.is_timeout() {
        AppError::Timeout(timeout_secs)
    } else if e.is_connect() {
        AppError::NetworkError(format!("Connection failed: {e}"))
    } else {
        AppError::HttpError(e.to_string())
    }
}

/// Read the body of a response and decode it, turning error statuses into
/// [`AppError`]s. `what` names the endpoint in messages (never the full URL,
/// which may carry the API key).
pub(crate) async fn decode<T: DeserializeOwned>(
    response: Response,
    what: &str,
    timeout_secs: u64,
) -> Result<T, AppError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| send_error(e, timeout_secs))?;

    if !status.is_success() {
        return Err(status_error(status, &body, what));
    }
    Ok(serde_json::from_str(&body)?)
}

fn status_error(status: StatusCode, body: &str, what: &str) -> AppError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();
    let reason = parsed
        .as_ref()
        .and_then(|b| b.error.errors.first())
        .and_then(|r| r.reason.clone());
    let message = parsed
        .and_then(|b| b.error.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    let quota = reason
        .as_deref()
        .is_some_and(|r| r.contains("quota") || r.contains("rateLimit"));

    // YouTube reports an invalid key as a 400 rather than a 401.
    let bad_key = status == StatusCode::BAD_REQUEST && message.contains("API key");

    match status {
        StatusCode::UNAUTHORIZED => AppError::AuthError(format!("{what}: {message}")),
        StatusCode::FORBIDDEN if !quota => AppError::AuthError(format!("{what}: {message}")),
        _ if bad_key => AppError::AuthError(format!("{what}: {message}")),
        _ => AppError::HttpError(format!(
            "HTTP {} for {what}{}: {message}",
            status.as_u16(),
            reason.map(|r| format!(" ({r})")).unwrap_or_default()
        )),
    }
}
