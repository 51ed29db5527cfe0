//! Frequently used imports for handlers.

pub use crate::{
    authentication::Authentication,
    domain,
    error::{EyreResult, OctovocResult},
    schema,
    utils::diesel::{eq, query},
    OctovocState,
};
pub use axum::{
    extract::{Path, Query, State},
    Json,
};
pub use diesel::prelude::*;
pub use eyre::WrapErr;
pub use octovoc_api::{request as req, response as res};
pub use tracing::instrument;
