//! /student
//! Handlers for a student's progress through modules and batteries.

use super::prelude::*;
use octovoc_core::{BatteryId, ModuleId};

// handlers

/// Starts or resumes a module.
#[instrument]
pub async fn start_module(
    State(state): State<OctovocState>,
    user: Authentication,
    Path(module_id): Path<ModuleId>,
) -> OctovocResult<Json<res::ModuleProgress>> {
    let progress = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let progress = conn.transaction(|conn| {
            domain::progress::start_module(conn, user.user_id, module_id)
        })?;
        EyreResult::Ok(progress)
    })
    .await??;

    Ok(Json(progress))
}

/// Starts or resumes a battery of a started module.
#[instrument]
pub async fn start_battery(
    State(state): State<OctovocState>,
    user: Authentication,
    Path(battery_id): Path<BatteryId>,
) -> OctovocResult<Json<res::BatteryStart>> {
    let start = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let start = conn.transaction(|conn| {
            domain::progress::start_battery(conn, user.user_id, battery_id)
        })?;
        EyreResult::Ok(start)
    })
    .await??;

    Ok(Json(start))
}

/// Grades an answer and moves the battery along.
#[instrument]
pub async fn answer_question(
    State(state): State<OctovocState>,
    user: Authentication,
    Json(answer): Json<req::AnswerQuestion<'static>>,
) -> OctovocResult<Json<res::AnswerResult>> {
    let result = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let result = conn.transaction(|conn| {
            domain::progress::answer_question(conn, user.user_id, answer)
                .wrap_err("Failed to record answer")
        })?;
        EyreResult::Ok(result)
    })
    .await??;

    Ok(Json(result))
}

/// Marks a module complete and picks a quote to celebrate.
#[instrument]
pub async fn complete_module(
    State(state): State<OctovocState>,
    user: Authentication,
    Path(module_id): Path<ModuleId>,
) -> OctovocResult<Json<res::ModuleCompletion>> {
    let completion = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let progress = conn.transaction(|conn| {
            domain::progress::complete_module(conn, user.user_id, module_id)
        })?;
        let quote = domain::quotes::random_quote(&mut conn)?;
        EyreResult::Ok(res::ModuleCompletion { quote, progress })
    })
    .await??;

    Ok(Json(completion))
}
