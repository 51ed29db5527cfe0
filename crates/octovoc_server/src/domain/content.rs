//! Functions related to module content: modules, batteries and their words.

use super::progress;
use crate::{error::RequestError, utils::diesel::query};
use diesel::prelude::*;
use octovoc_api::response as res;
use octovoc_core::{BatteryId, ModuleId, Word, WordId};
use octovoc::queue::QuestionQueue;
use std::collections::HashMap;

/// Loads an active module. Guests may only see free modules.
pub fn module(
    conn: &mut PgConnection,
    module_id: ModuleId,
    guest: bool,
) -> eyre::Result<ModuleQuery> {
    use crate::schema::modules as m;

    let module = m::table
        .filter(m::id.eq(module_id).and(m::is_active.eq(true)))
        .select(ModuleQuery::as_select())
        .get_result(conn)
        .optional()?
        .ok_or(RequestError::NotFound("Module"))?;
    if guest && !module.is_free {
        return Err(RequestError::Unauthorized.into());
    }
    Ok(module)
}

/// The active modules in display order, optionally of a single level, with the progress the
/// student has made in them.
pub fn modules(
    conn: &mut PgConnection,
    user_id: Option<i32>,
    level: Option<i32>,
) -> eyre::Result<Vec<res::ModuleSummary>> {
    use crate::schema::modules as m;

    let mut query = m::table
        .filter(m::is_active.eq(true))
        .order_by((m::display_order, m::id))
        .select(ModuleSummaryQuery::as_select())
        .into_boxed();
    if let Some(level) = level {
        query = query.filter(m::level.eq(level));
    }
    let modules: Vec<ModuleSummaryQuery> = query.load(conn)?;

    let mut progress = match user_id {
        Some(user_id) => progress::module_progresses(conn, user_id)?
            .into_iter()
            .map(|progress| (progress.module_id, progress))
            .collect(),
        None => HashMap::new(),
    };
    tracing::debug!("listing {} modules", modules.len());
    Ok(modules
        .into_iter()
        .map(|module| {
            let progress = progress.remove(&module.id);
            summary(module, progress)
        })
        .collect())
}

fn summary(
    module: ModuleSummaryQuery,
    progress: Option<res::ModuleProgress>,
) -> res::ModuleSummary {
    res::ModuleSummary {
        id: module.id,
        name: module.name,
        level: module.level,
        is_free: module.is_free,
        completion_percentage: progress.as_ref().map(progress::completion_percentage),
        progress,
    }
}

/// The ids of the module's batteries by battery number.
pub fn battery_ids(conn: &mut PgConnection, module_id: ModuleId) -> eyre::Result<Vec<BatteryId>> {
    use crate::schema::batteries as b;

    let ids = b::table
        .filter(b::module_id.eq(module_id))
        .order_by((b::battery_number, b::id))
        .select(b::id)
        .get_results(conn)?;
    Ok(ids)
}

/// The module with its batteries in a fresh random order.
pub fn module_outline(
    conn: &mut PgConnection,
    module_id: ModuleId,
    guest: bool,
) -> eyre::Result<res::ModuleOutline> {
    let module = module(conn, module_id, guest)?;
    let battery_ids = battery_ids(conn, module_id)?;
    Ok(res::ModuleOutline {
        id: module.id,
        name: module.name,
        is_free: module.is_free,
        battery_order: QuestionQueue::shuffled(battery_ids).to_vec(),
    })
}

/// Loads a battery of an active module. Guests may only see batteries of free modules.
pub fn battery(
    conn: &mut PgConnection,
    battery_id: BatteryId,
    guest: bool,
) -> eyre::Result<BatteryQuery> {
    use crate::schema::batteries as b;

    let battery = b::table
        .find(battery_id)
        .select(BatteryQuery::as_select())
        .get_result(conn)
        .optional()?
        .ok_or(RequestError::NotFound("Battery"))?;
    module(conn, battery.module_id, guest)?;
    Ok(battery)
}

/// The battery with its words in battery order.
pub fn battery_content(
    conn: &mut PgConnection,
    battery_id: BatteryId,
    guest: bool,
) -> eyre::Result<res::BatteryContent> {
    let battery = battery(conn, battery_id, guest)?;
    let words = words_in_order(conn, &battery.word_ids)?;
    Ok(res::BatteryContent {
        id: battery.id,
        module_id: battery.module_id,
        words,
    })
}

/// Loads a single word with its module's case sensitivity.
pub fn word(conn: &mut PgConnection, word_id: WordId) -> eyre::Result<Word> {
    use crate::schema::{modules as m, words as w};

    let word = w::table
        .inner_join(m::table)
        .filter(w::id.eq(word_id))
        .select(WordQuery::as_select())
        .get_result(conn)
        .optional()?
        .ok_or(RequestError::NotFound("Word"))?;
    Ok(word.into())
}

/// Loads the given words in the given order, skipping ids that don't exist.
pub fn words_in_order(conn: &mut PgConnection, word_ids: &[WordId]) -> eyre::Result<Vec<Word>> {
    use crate::schema::{modules as m, words as w};

    let mut words = w::table
        .inner_join(m::table)
        .filter(w::id.eq_any(word_ids))
        .select(WordQuery::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| (row.id, Word::from(row)))
        .collect::<HashMap<_, _>>();
    if words.len() != word_ids.len() {
        tracing::warn!(
            "found {} of {} words",
            words.len(),
            word_ids.len()
        );
    }
    Ok(word_ids.iter().filter_map(|id| words.remove(id)).collect())
}

// queries

query! {
    #[derive(Debug)]
    pub struct ModuleQuery {
        pub id: i32 = modules::id,
        pub name: String = modules::name,
        pub is_free: bool = modules::is_free,
        pub case_sensitive: bool = modules::case_sensitive,
    }
}

query! {
    #[derive(Debug)]
    struct ModuleSummaryQuery {
        id: i32 = modules::id,
        name: String = modules::name,
        level: i32 = modules::level,
        is_free: bool = modules::is_free,
    }
}

query! {
    #[derive(Debug)]
    pub struct BatteryQuery {
        pub id: i32 = batteries::id,
        pub module_id: i32 = batteries::module_id,
        pub word_ids: Vec<i32> = batteries::word_ids,
    }
}

query! {
    #[derive(Debug)]
    struct WordQuery {
        id: i32 = words::id,
        word: String = words::word,
        meaning: String = words::meaning,
        example_sentence: String = words::example_sentence,
        case_sensitive: bool = modules::case_sensitive,
        module_id: i32 = words::module_id,
        position_in_module: i32 = words::position_in_module,
    }
}

impl From<WordQuery> for Word {
    fn from(row: WordQuery) -> Self {
        Self {
            id: row.id,
            word: row.word,
            meaning: row.meaning,
            example_sentence: row.example_sentence,
            case_sensitive: row.case_sensitive,
            module_id: Some(row.module_id),
            position_in_module: Some(row.position_in_module),
        }
    }
}
