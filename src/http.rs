//! Small helpers shared by the HTTP provider clients.

use std::time::Duration;

use thiserror::Error;

/// Longest error body kept in a [`StatusError`].
const MAX_BODY_CHARS: usize = 300;

/// A provider answered with a non-success status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider returned HTTP {status}: {body}")]
pub struct StatusError {
    pub status: u16,
    pub body: String,
}

/// Build a `reqwest::Client` with a per-request timeout.
///
/// A default (no-timeout) client is used as a last-resort fallback if the
/// builder fails.
pub(crate) fn client_with_timeout(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Pass a successful response through; turn anything else into a
/// [`StatusError`] carrying the (truncated) body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, StatusError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StatusError {
        status: status.as_u16(),
        body: truncate(body.trim(), MAX_BODY_CHARS),
    })
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push('…');
        out
    }
}
