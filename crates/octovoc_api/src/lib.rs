//! Types for communication between the backend and its clients.

pub mod request;
pub mod response;

pub const SESSION_COOKIE_NAME: &str = "octovoc_session";
