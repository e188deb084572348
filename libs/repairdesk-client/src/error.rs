use repairdesk_contract::UploadViolation;
use serde::Deserialize;
use thiserror::Error;

/// Everything a client call can fail with. The `Display` text is meant to be
/// shown to the user as-is.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected locally; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("could not reach the server: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected response from the server: {0}")]
    Decode(String),

    /// Another dashboard action is still in flight.
    #[error("another action is still in progress")]
    Busy,

    #[error("token storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

impl From<UploadViolation> for ClientError {
    fn from(v: UploadViolation) -> Self {
        Self::Validation(v.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e)
        }
    }
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Builds an `Api` error from a failed response body: the Problem
    /// `detail` when present, else a generic message for the status.
    pub(crate) fn from_response(status: u16, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct Detail {
            detail: Option<serde_json::Value>,
        }

        let detail = serde_json::from_slice::<Detail>(body)
            .ok()
            .and_then(|d| d.detail)
            .and_then(|v| match v {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            });

        Self::Api {
            status,
            message: detail.unwrap_or_else(|| fallback_message(status).to_string()),
        }
    }
}

fn fallback_message(status: u16) -> &'static str {
    match status {
        400 => "The request was invalid",
        401 => "Please sign in again",
        403 => "You do not have permission to do that",
        404 => "Not found",
        409 => "The request conflicts with the current state",
        413 => "The upload is too large",
        500..=599 => "The server failed to process the request",
        _ => "The request failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_detail_becomes_message() {
        let err = ClientError::from_response(
            401,
            br#"{"type":"about:blank","title":"Unauthorized","status":401,"detail":"Incorrect email or password"}"#,
        );
        assert_eq!(err.to_string(), "Incorrect email or password");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn falls_back_when_body_has_no_detail() {
        assert_eq!(
            ClientError::from_response(500, b"<html>oops</html>").to_string(),
            "The server failed to process the request"
        );
        assert_eq!(
            ClientError::from_response(403, br#"{"detail":""}"#).to_string(),
            "You do not have permission to do that"
        );
    }

    #[test]
    fn upload_violations_are_validation_errors() {
        let err: ClientError = UploadViolation::Empty.into();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(err.to_string(), "no files selected");
    }
}
