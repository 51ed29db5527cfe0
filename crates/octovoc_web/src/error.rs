//! Our custom error type.

use octovoc::api::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct WebError {
    pub message: String,
    /// The HTTP status of a failed request.
    #[serde(default)]
    pub status: Option<u16>,
}

impl WebError {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            status: Some(status),
        }
    }

    pub fn from<E: std::error::Error>(e: E) -> Self {
        Self::new(e)
    }
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::new(format!("{value:#?}"))
    }
}

impl From<WebError> for ApiError {
    fn from(value: WebError) -> Self {
        match value.status {
            Some(status) => ApiError::with_status(status, value.message),
            None => ApiError::new(value.message),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_survives_conversion() {
        let err = ApiError::from(WebError::with_status(401, "Not logged in"));
        assert!(err.is_unauthorized());
        assert_eq!(err.message, "Not logged in");

        let err = ApiError::from(WebError::new("Failed to fetch"));
        assert_eq!(err.status, None);
    }
}
