//! /student/quote
//! Handlers for the rewards shown after completing a module.

use super::prelude::*;

// handlers

/// Picks a random active quote. Available without logging in.
#[instrument]
pub async fn random(State(state): State<OctovocState>) -> OctovocResult<Json<res::RandomQuote>> {
    let quote = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let quote = domain::quotes::random_quote(&mut conn)?;
        EyreResult::Ok(quote)
    })
    .await??;

    Ok(Json(res::RandomQuote { quote }))
}
