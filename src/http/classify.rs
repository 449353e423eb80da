use super::transport::HttpResponse;
use crate::error::{ErrorResponse, SparqlError, SparqlResult};
use reqwest::StatusCode;
use tracing::debug;

/// Error for a non-success response body
///
/// A `{ "message", "code" }` JSON body becomes a query error, anything else
/// an HTTP error carrying the body text.
pub fn error_for(status: StatusCode, body: &str) -> SparqlError {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error) => SparqlError::Query {
            code: error.code,
            message: error.message,
            status,
        },
        Err(_) => {
            let message = if body.trim().is_empty() {
                format!("Server returned status {}", status.as_u16())
            } else {
                body.to_string()
            };
            SparqlError::Http { message, status }
        }
    }
}

/// Classify a status and an already collected body
pub fn classify(status: StatusCode, body: &str) -> SparqlResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(error_for(status, body))
    }
}

/// Pass a successful response through untouched; otherwise read its body
/// and turn it into an error
pub async fn ensure_success(response: HttpResponse) -> SparqlResult<HttpResponse> {
    if response.status.is_success() {
        return Ok(response);
    }
    let status = response.status;
    let body = response.text().await?;
    debug!(status = status.as_u16(), "Request failed");
    Err(error_for(status, &body))
}

/// Read the body of a successful response as text
pub async fn success_text(response: HttpResponse) -> SparqlResult<String> {
    ensure_success(response).await?.text().await
}
