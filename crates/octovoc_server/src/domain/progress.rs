//! Functions related to a student's progress through a module and its batteries.
//!
//! The battery phases run on the same state machine as guest practice in the browser, so both
//! modes ask the same questions in the same way.

use super::content;
use crate::{
    error::RequestError,
    utils::diesel::{eq, query},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use octovoc::{
    battery::{BatteryRun, Transition},
    queue::QuestionQueue,
};
use octovoc_api::{request as req, response as res};
use octovoc_core::{answer, BatteryId, ModuleId, Phase, WordId};

/// Starts the module for the student, or returns the progress they already have.
pub fn start_module(
    conn: &mut PgConnection,
    user_id: i32,
    module_id: ModuleId,
) -> eyre::Result<res::ModuleProgress> {
    use crate::schema::student_progress as sp;

    content::module(conn, module_id, false)?;
    if let Some(progress) = find_module_progress(conn, user_id, module_id)? {
        tracing::debug!("resuming module {module_id}");
        return Ok(progress);
    }

    let battery_order = QuestionQueue::shuffled(content::battery_ids(conn, module_id)?).to_vec();
    let current_battery_id = battery_order.first().copied();
    // a module without batteries goes straight to its (empty) final round
    let in_final_round = battery_order.is_empty();
    tracing::info!("starting module {module_id} with battery order {battery_order:?}");
    diesel::insert_into(sp::table)
        .values(eq!(
            sp,
            user_id,
            module_id,
            current_battery_id,
            battery_order,
            in_final_round
        ))
        .on_conflict((sp::user_id, sp::module_id))
        .do_nothing()
        .execute(conn)?;

    find_module_progress(conn, user_id, module_id)?
        .ok_or_else(|| eyre::eyre!("Module progress for module {module_id} was not saved"))
}

/// Starts the battery for the student, or resumes it where they left off.
pub fn start_battery(
    conn: &mut PgConnection,
    user_id: i32,
    battery_id: BatteryId,
) -> eyre::Result<res::BatteryStart> {
    use crate::schema::battery_progress as bp;

    let battery = content::battery(conn, battery_id, false)?;
    let mut module_progress = find_module_progress(conn, user_id, battery.module_id)?
        .ok_or(RequestError::NotFound("Module progress"))?;

    let mut battery_progress = match find_battery_progress(conn, module_progress.id, battery_id)? {
        Some(battery_progress) => battery_progress,
        None => {
            let run = BatteryRun::start(battery_id, battery.word_ids.clone());
            let student_progress_id = module_progress.id;
            let current_question_queue = run.queue().to_vec();
            diesel::insert_into(bp::table)
                .values(eq!(
                    bp,
                    student_progress_id,
                    battery_id,
                    current_question_queue
                ))
                .on_conflict((bp::student_progress_id, bp::battery_id))
                .do_nothing()
                .execute(conn)?;
            find_battery_progress(conn, module_progress.id, battery_id)?.ok_or_else(|| {
                eyre::eyre!("Battery progress for battery {battery_id} was not saved")
            })?
        }
    };

    if complete_empty_battery(&mut module_progress, &mut battery_progress, Utc::now()) {
        tracing::warn!("battery {battery_id} has no words, marking it complete");
        save_battery_progress(conn, &battery_progress)?;
        save_module_progress(conn, &module_progress)?;
    }

    let current_word_id = battery_progress
        .current_question_queue
        .first()
        .copied()
        .filter(|_| !battery_progress.is_completed);
    let battery_words = content::words_in_order(conn, &battery.word_ids)?;
    let current_word = match current_word_id {
        Some(word_id) => match battery_words.iter().find(|w| w.id == word_id) {
            Some(word) => Some(word.clone()),
            None => Some(content::word(conn, word_id)?),
        },
        None => None,
    };

    Ok(res::BatteryStart {
        battery_progress,
        current_word,
        battery_words,
    })
}

/// Grades the answer and moves the student's battery along.
pub fn answer_question(
    conn: &mut PgConnection,
    user_id: i32,
    request: req::AnswerQuestion<'_>,
) -> eyre::Result<res::AnswerResult> {
    use crate::schema::{
        battery_progress as bp, question_attempts as qa, student_progress as sp,
    };

    let battery_progress_id = request
        .battery_progress_id
        .ok_or_else(|| RequestError::BadRequest("Missing battery progress id".to_string()))?;
    let (battery_row, module_row) = bp::table
        .inner_join(sp::table)
        .filter(bp::id.eq(battery_progress_id))
        .select((
            BatteryProgressQuery::as_select(),
            ModuleProgressQuery::as_select(),
        ))
        .get_result::<(BatteryProgressQuery, ModuleProgressQuery)>(conn)
        .optional()?
        .ok_or(RequestError::NotFound("Battery progress"))?;
    if module_row.user_id != user_id {
        return Err(
            RequestError::Forbidden("Battery progress belongs to another student").into(),
        );
    }
    let mut battery_progress = res::BatteryProgress::try_from(battery_row)?;
    let mut module_progress = res::ModuleProgress::from(module_row);

    let phase = battery_progress.current_phase;
    if request.phase != phase {
        return Err(RequestError::BadRequest(format!(
            "Answer is for phase {} but the battery is in phase {phase}",
            request.phase
        ))
        .into());
    }

    let battery = content::battery(conn, battery_progress.battery_id, false)?;
    if !battery.word_ids.contains(&request.word_id) {
        return Err(RequestError::BadRequest(format!(
            "Word {} is not part of battery {}",
            request.word_id, battery.id
        ))
        .into());
    }
    let word = content::word(conn, request.word_id)?;
    let is_correct = answer::is_correct(&word, phase, &request.answer);

    let answered = record_answer(
        &mut module_progress,
        &mut battery_progress,
        &battery.word_ids,
        word.id,
        is_correct,
        Utc::now(),
    )?;

    let word_id = word.id;
    {
        let phase = i32::from(phase);
        let user_answer = request.answer.as_ref();
        diesel::insert_into(qa::table)
            .values(eq!(
                qa,
                battery_progress_id,
                word_id,
                phase,
                user_answer,
                is_correct
            ))
            .execute(conn)?;
    }
    if answered.missed {
        add_difficult_word(conn, user_id, word_id)?;
    }
    save_battery_progress(conn, &battery_progress)?;
    save_module_progress(conn, &module_progress)?;

    let next_word = match answered.transition {
        Transition::Next(next) | Transition::PhaseComplete { next, .. } => {
            Some(content::word(conn, next)?)
        }
        Transition::BatteryComplete => None,
    };
    Ok(res::AnswerResult {
        is_correct,
        correct_answer: answer::expected_answer(&word, phase).to_string(),
        battery_progress: Some(battery_progress),
        next_word,
        phase_complete: matches!(answered.transition, Transition::PhaseComplete { .. }),
        battery_complete: answered.transition == Transition::BatteryComplete,
    })
}

/// Marks the module complete once its final round is done.
pub fn complete_module(
    conn: &mut PgConnection,
    user_id: i32,
    module_id: ModuleId,
) -> eyre::Result<res::ModuleProgress> {
    let mut progress = find_module_progress(conn, user_id, module_id)?
        .ok_or(RequestError::NotFound("Module progress"))?;
    complete(&mut progress, Utc::now())?;
    save_module_progress(conn, &progress)?;
    tracing::info!("module {module_id} complete");
    Ok(progress)
}

pub fn find_module_progress(
    conn: &mut PgConnection,
    user_id: i32,
    module_id: ModuleId,
) -> eyre::Result<Option<res::ModuleProgress>> {
    use crate::schema::student_progress as sp;

    let progress = sp::table
        .filter(sp::user_id.eq(user_id).and(sp::module_id.eq(module_id)))
        .select(ModuleProgressQuery::as_select())
        .get_result(conn)
        .optional()?
        .map(res::ModuleProgress::from);
    Ok(progress)
}

/// Every module the student has started.
pub fn module_progresses(
    conn: &mut PgConnection,
    user_id: i32,
) -> eyre::Result<Vec<res::ModuleProgress>> {
    use crate::schema::student_progress as sp;

    let progresses = sp::table
        .filter(sp::user_id.eq(user_id))
        .select(ModuleProgressQuery::as_select())
        .load(conn)?
        .into_iter()
        .map(res::ModuleProgress::from)
        .collect();
    Ok(progresses)
}

fn find_battery_progress(
    conn: &mut PgConnection,
    student_progress_id: i32,
    battery_id: BatteryId,
) -> eyre::Result<Option<res::BatteryProgress>> {
    use crate::schema::battery_progress as bp;

    bp::table
        .filter(
            bp::student_progress_id
                .eq(student_progress_id)
                .and(bp::battery_id.eq(battery_id)),
        )
        .select(BatteryProgressQuery::as_select())
        .get_result(conn)
        .optional()?
        .map(res::BatteryProgress::try_from)
        .transpose()
}

pub fn save_module_progress(
    conn: &mut PgConnection,
    progress: &res::ModuleProgress,
) -> eyre::Result<()> {
    use crate::schema::student_progress as sp;

    diesel::update(sp::table.find(progress.id))
        .set((
            sp::current_battery_id.eq(progress.current_battery_id),
            sp::completed_batteries.eq(&progress.completed_batteries),
            sp::in_final_round.eq(progress.in_final_round),
            sp::final_round_word_ids.eq(&progress.final_round_word_ids),
            sp::is_completed.eq(progress.is_completed),
            sp::completion_date.eq(progress.completion_date),
        ))
        .execute(conn)?;
    Ok(())
}

fn save_battery_progress(
    conn: &mut PgConnection,
    progress: &res::BatteryProgress,
) -> eyre::Result<()> {
    use crate::schema::battery_progress as bp;

    diesel::update(bp::table.find(progress.id))
        .set((
            bp::current_phase.eq(i32::from(progress.current_phase)),
            bp::current_question_queue.eq(&progress.current_question_queue),
            bp::phase1_completed.eq(progress.phase1_completed),
            bp::phase2_completed.eq(progress.phase2_completed),
            bp::phase3_completed.eq(progress.phase3_completed),
            bp::is_completed.eq(progress.is_completed),
            bp::completed_at.eq(progress.completed_at),
        ))
        .execute(conn)?;
    Ok(())
}

/// Adds the word to the student's difficult words unless it's already there.
pub fn add_difficult_word(
    conn: &mut PgConnection,
    user_id: i32,
    word_id: WordId,
) -> eyre::Result<()> {
    use crate::schema::difficult_words as dw;

    let inserted = diesel::insert_into(dw::table)
        .values(eq!(dw, user_id, word_id))
        .on_conflict((dw::user_id, dw::word_id))
        .do_nothing()
        .execute(conn)?;
    if inserted > 0 {
        tracing::info!("word {word_id} added to difficult words");
    }
    Ok(())
}

/// The outcome of a recorded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answered {
    pub transition: Transition,
    /// Set for free production misses, which go to the final round and the difficult words.
    pub missed: bool,
}

/// Records an answer to the head of the battery's queue and updates both progress records.
pub fn record_answer(
    module: &mut res::ModuleProgress,
    battery: &mut res::BatteryProgress,
    battery_word_ids: &[WordId],
    word_id: WordId,
    correct: bool,
    now: DateTime<Utc>,
) -> Result<Answered, RequestError> {
    if battery.is_completed {
        return Err(RequestError::BadRequest(format!(
            "Battery {} is complete",
            battery.battery_id
        )));
    }

    let phase = battery.current_phase;
    let mut run = BatteryRun::resume(
        battery.battery_id,
        battery_word_ids.to_vec(),
        phase,
        battery.current_question_queue.clone(),
        false,
    );
    let transition = run
        .record(word_id, correct)
        .map_err(|err| RequestError::BadRequest(err.to_string()))?;

    let missed = !correct && phase == Phase::FreeProduction;
    if missed && !module.final_round_word_ids.contains(&word_id) {
        module.final_round_word_ids.push(word_id);
    }

    battery.current_phase = run.phase();
    battery.current_question_queue = run.queue().to_vec();
    match transition {
        Transition::Next(_) => {}
        Transition::PhaseComplete { .. } => match phase {
            Phase::Recognition => battery.phase1_completed = true,
            Phase::CuedRecall => battery.phase2_completed = true,
            Phase::FreeProduction => battery.phase3_completed = true,
        },
        Transition::BatteryComplete => finish_battery(module, battery, now),
    }

    Ok(Answered { transition, missed })
}

/// Completes a battery that has nothing left to ask without ever being answered, which happens
/// when it has no words. Returns whether the battery was completed.
pub fn complete_empty_battery(
    module: &mut res::ModuleProgress,
    battery: &mut res::BatteryProgress,
    now: DateTime<Utc>,
) -> bool {
    if battery.is_completed || !battery.current_question_queue.is_empty() {
        return false;
    }
    battery.phase1_completed = true;
    battery.phase2_completed = true;
    finish_battery(module, battery, now);
    true
}

fn finish_battery(
    module: &mut res::ModuleProgress,
    battery: &mut res::BatteryProgress,
    now: DateTime<Utc>,
) {
    battery.phase3_completed = true;
    battery.is_completed = true;
    battery.completed_at = Some(now);
    battery.current_question_queue.clear();
    complete_battery(module, battery.battery_id);
}

/// Moves the module on to its next uncompleted battery, or to the final round once every battery
/// is done.
fn complete_battery(module: &mut res::ModuleProgress, battery_id: BatteryId) {
    if !module.completed_batteries.contains(&battery_id) {
        module.completed_batteries.push(battery_id);
    }
    module.current_battery_id = next_battery(&module.battery_order, &module.completed_batteries);
    if module.current_battery_id.is_none() {
        tracing::info!("all batteries of module {} complete", module.module_id);
        module.in_final_round = true;
    }
}

/// The first battery in the order that has not been completed.
pub fn next_battery(order: &[BatteryId], completed: &[BatteryId]) -> Option<BatteryId> {
    order.iter().copied().find(|id| !completed.contains(id))
}

/// Completes a module whose batteries and final round are all done.
pub fn complete(
    module: &mut res::ModuleProgress,
    now: DateTime<Utc>,
) -> Result<(), RequestError> {
    if !module.is_completed
        && !(module.in_final_round && module.final_round_word_ids.is_empty())
    {
        return Err(RequestError::BadRequest(format!(
            "Module {} still has words to practise",
            module.module_id
        )));
    }
    mark_complete(module, now);
    Ok(())
}

/// The share of the module's batteries that are completed, from 0 to 100.
pub fn completion_percentage(module: &res::ModuleProgress) -> f64 {
    if module.battery_order.is_empty() {
        return 0.0;
    }
    module.completed_batteries.len() as f64 / module.battery_order.len() as f64 * 100.0
}

/// Marks the module complete, keeping the date it was first completed on.
pub fn mark_complete(module: &mut res::ModuleProgress, now: DateTime<Utc>) {
    module.is_completed = true;
    module.completion_date.get_or_insert(now);
}

// queries

query! {
    #[derive(Debug)]
    struct ModuleProgressQuery {
        id: i32 = student_progress::id,
        user_id: i32 = student_progress::user_id,
        module_id: i32 = student_progress::module_id,
        current_battery_id: Option<i32> = student_progress::current_battery_id,
        battery_order: Vec<i32> = student_progress::battery_order,
        completed_batteries: Vec<i32> = student_progress::completed_batteries,
        in_final_round: bool = student_progress::in_final_round,
        final_round_word_ids: Vec<i32> = student_progress::final_round_word_ids,
        is_completed: bool = student_progress::is_completed,
        completion_date: Option<DateTime<Utc>> = student_progress::completion_date,
        started_at: DateTime<Utc> = student_progress::started_at,
    }
}

impl From<ModuleProgressQuery> for res::ModuleProgress {
    fn from(row: ModuleProgressQuery) -> Self {
        Self {
            id: row.id,
            module_id: row.module_id,
            current_battery_id: row.current_battery_id,
            battery_order: row.battery_order,
            completed_batteries: row.completed_batteries,
            in_final_round: row.in_final_round,
            final_round_word_ids: row.final_round_word_ids,
            is_completed: row.is_completed,
            completion_date: row.completion_date,
            started_at: row.started_at,
        }
    }
}

query! {
    #[derive(Debug)]
    struct BatteryProgressQuery {
        id: i32 = battery_progress::id,
        battery_id: i32 = battery_progress::battery_id,
        current_phase: i32 = battery_progress::current_phase,
        current_question_queue: Vec<i32> = battery_progress::current_question_queue,
        phase1_completed: bool = battery_progress::phase1_completed,
        phase2_completed: bool = battery_progress::phase2_completed,
        phase3_completed: bool = battery_progress::phase3_completed,
        is_completed: bool = battery_progress::is_completed,
        completed_at: Option<DateTime<Utc>> = battery_progress::completed_at,
    }
}

impl TryFrom<BatteryProgressQuery> for res::BatteryProgress {
    type Error = eyre::Report;

    fn try_from(row: BatteryProgressQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            battery_id: row.battery_id,
            current_phase: Phase::try_from(row.current_phase)?,
            current_question_queue: row.current_question_queue,
            phase1_completed: row.phase1_completed,
            phase2_completed: row.phase2_completed,
            phase3_completed: row.phase3_completed,
            is_completed: row.is_completed,
            completed_at: row.completed_at,
        })
    }
}
