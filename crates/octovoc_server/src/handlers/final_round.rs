//! /student/module/{id}/final-round
//! Handlers for the final round of a module.

use super::prelude::*;
use octovoc_core::ModuleId;

// handlers

/// Starts the final round, completing the module right away if there is nothing to practise.
#[instrument]
pub async fn start(
    State(state): State<OctovocState>,
    user: Authentication,
    Path(module_id): Path<ModuleId>,
) -> OctovocResult<Json<res::FinalRoundStart>> {
    let start = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let start = conn.transaction(|conn| {
            domain::final_round::start_final_round(conn, user.user_id, module_id)
        })?;
        EyreResult::Ok(start)
    })
    .await??;

    Ok(Json(start))
}

/// Grades a final round answer.
#[instrument]
pub async fn answer(
    State(state): State<OctovocState>,
    user: Authentication,
    Path(module_id): Path<ModuleId>,
    Json(answer): Json<req::FinalRoundAnswer<'static>>,
) -> OctovocResult<Json<res::FinalRoundResult>> {
    let result = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let result = conn.transaction(|conn| {
            domain::final_round::answer_final_round(conn, user.user_id, module_id, answer)
                .wrap_err("Failed to record final round answer")
        })?;
        EyreResult::Ok(result)
    })
    .await??;

    Ok(Json(result))
}
