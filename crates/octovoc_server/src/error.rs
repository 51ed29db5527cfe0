//! Octovoc server error type.

use axum::{
    http::{Response, StatusCode},
    response::IntoResponse,
};
use octovoc_api::response as res;
use thiserror::Error;

pub type OctovocResult<T> = Result<T, OctovocError>;

pub struct OctovocError(eyre::Error);

impl<E> From<E> for OctovocError
where
    E: Into<eyre::Error>,
{
    fn from(value: E) -> Self {
        Self(value.into())
    }
}

/// Errors caused by the request rather than the server.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Not logged in")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    BadRequest(String),
}

impl RequestError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl OctovocError {
    fn status_and_message(&self) -> (StatusCode, String) {
        if let Some(err) = self.0.downcast_ref::<RequestError>() {
            (err.status(), err.to_string())
        } else if let Some(diesel::result::Error::NotFound) =
            self.0.downcast_ref::<diesel::result::Error>()
        {
            (StatusCode::NOT_FOUND, "Not found".to_string())
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#?}", self.0))
        }
    }
}

impl IntoResponse for OctovocError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!("{message}");
        }
        let err = res::Error { message };
        let body = serde_json::to_string(&err).expect("failed to serialize response");
        Response::builder()
            .status(status)
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("failed to construct response")
            .into_response()
    }
}

pub type EyreResult<T> = Result<T, eyre::Report>;
