//! /auth
//! Handlers related to authentication.

use super::prelude::*;

// handlers

/// Fetches the currently logged in user, if any.
#[instrument]
pub async fn current(user: Option<Authentication>) -> OctovocResult<Json<Option<i32>>> {
    Ok(Json(user.map(|u| u.user_id)))
}
