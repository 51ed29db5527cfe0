//! /content
//! Handlers for module content. Guests practise free modules with these.

use super::prelude::*;
use octovoc_core::{BatteryId, ModuleId};

// handlers

/// Lists the active modules, with the student's progress if they're logged in.
#[instrument]
pub async fn modules(
    State(state): State<OctovocState>,
    user: Option<Authentication>,
    Query(filter): Query<req::ModuleFilter>,
) -> OctovocResult<Json<Vec<res::ModuleSummary>>> {
    let user_id = user.map(|user| user.user_id);
    let modules = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let modules = domain::content::modules(&mut conn, user_id, filter.level)?;
        EyreResult::Ok(modules)
    })
    .await??;

    Ok(Json(modules))
}

/// Fetches a module with its batteries in a new random order.
#[instrument]
pub async fn module_outline(
    State(state): State<OctovocState>,
    user: Option<Authentication>,
    Path(module_id): Path<ModuleId>,
) -> OctovocResult<Json<res::ModuleOutline>> {
    let guest = user.is_none();
    let outline = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let outline = domain::content::module_outline(&mut conn, module_id, guest)?;
        EyreResult::Ok(outline)
    })
    .await??;

    Ok(Json(outline))
}

/// Fetches the words of a battery.
#[instrument]
pub async fn battery(
    State(state): State<OctovocState>,
    user: Option<Authentication>,
    Path(battery_id): Path<BatteryId>,
) -> OctovocResult<Json<res::BatteryContent>> {
    let guest = user.is_none();
    let battery = tokio::task::spawn_blocking(move || {
        let mut conn = state.pool.get()?;
        let battery = domain::content::battery_content(&mut conn, battery_id, guest)?;
        EyreResult::Ok(battery)
    })
    .await??;

    Ok(Json(battery))
}
