use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - credential rejected")]
    Unauthorized,

    #[error("Resource not found")]
    NotFound,

    #[error("Request rejected with status {status}")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    /// Transport failure while talking to the API.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// The outgoing request could not be built from caller input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid API configuration: {0}")]
    Configuration(String),
}

/// Error bodies the external API may send back. Only the human-readable field
/// is of interest; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            _ => {
                let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
                ApiError::Rejected {
                    status,
                    message: parsed
                        .error
                        .or(parsed.message)
                        .filter(|m| !m.trim().is_empty()),
                }
            }
        }
    }

    /// The API-supplied message, if the response carried one.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// user_message
    ///
    /// Text safe to show in a page: the API's own message when it sent one,
    /// otherwise `fallback`. Transport and status details stay in the logs.
    pub fn user_message(&self, fallback: &str) -> String {
        self.api_message().unwrap_or(fallback).to_string()
    }
}
