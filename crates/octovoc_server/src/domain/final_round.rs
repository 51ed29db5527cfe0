//! Functions related to the final round of a module.

use super::{content, progress};
use crate::error::RequestError;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use octovoc::queue::QuestionQueue;
use octovoc_api::{request as req, response as res};
use octovoc_core::{answer, ModuleId, WordId};

/// Starts the final round with the words missed in the module's batteries in a new random order.
pub fn start_final_round(
    conn: &mut PgConnection,
    user_id: i32,
    module_id: ModuleId,
) -> eyre::Result<res::FinalRoundStart> {
    let mut module = progress::find_module_progress(conn, user_id, module_id)?
        .ok_or(RequestError::NotFound("Module progress"))?;
    let started = start(&mut module, Utc::now())?;
    progress::save_module_progress(conn, &module)?;

    let current_word = started
        .current
        .map(|word_id| content::word(conn, word_id))
        .transpose()?;
    Ok(res::FinalRoundStart {
        completed: started.completed,
        current_word,
        total_words: started.remaining,
        remaining: started.remaining,
    })
}

/// Grades a final round answer. Misses are asked again and added to the difficult words.
pub fn answer_final_round(
    conn: &mut PgConnection,
    user_id: i32,
    module_id: ModuleId,
    request: req::FinalRoundAnswer<'_>,
) -> eyre::Result<res::FinalRoundResult> {
    let mut module = progress::find_module_progress(conn, user_id, module_id)?
        .ok_or(RequestError::NotFound("Module progress"))?;
    let word = content::word(conn, request.word_id)?;
    let is_correct = answer::is_correct_typed(&word, &request.answer);

    let answered = record_answer(&mut module, word.id, is_correct, Utc::now())?;
    if !is_correct {
        progress::add_difficult_word(conn, user_id, word.id)?;
    }
    progress::save_module_progress(conn, &module)?;

    let next_word = answered
        .next
        .map(|word_id| content::word(conn, word_id))
        .transpose()?;
    Ok(res::FinalRoundResult {
        is_correct,
        correct_answer: word.word,
        next_word,
        remaining: answered.remaining,
        final_round_complete: answered.complete,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Started {
    pub current: Option<WordId>,
    pub remaining: usize,
    /// Set when there was nothing left to practise.
    pub completed: bool,
}

/// Shuffles the final round words. A round without words completes the module.
pub fn start(
    module: &mut res::ModuleProgress,
    now: DateTime<Utc>,
) -> Result<Started, RequestError> {
    if !module.in_final_round && !module.is_completed {
        return Err(RequestError::NotFound("Final round"));
    }
    if module.is_completed || module.final_round_word_ids.is_empty() {
        tracing::info!("final round of module {} has no words", module.module_id);
        module.final_round_word_ids.clear();
        progress::mark_complete(module, now);
        return Ok(Started {
            current: None,
            remaining: 0,
            completed: true,
        });
    }

    let queue = QuestionQueue::shuffled(module.final_round_word_ids.iter().copied());
    module.final_round_word_ids = queue.to_vec();
    tracing::info!(
        "final round of module {} started with {} words",
        module.module_id,
        queue.len()
    );
    Ok(Started {
        current: queue.head(),
        remaining: queue.len(),
        completed: false,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answered {
    pub next: Option<WordId>,
    pub remaining: usize,
    pub complete: bool,
}

/// Records an answer to the head of the final round. Misses go to the back of the round.
pub fn record_answer(
    module: &mut res::ModuleProgress,
    word_id: WordId,
    correct: bool,
    now: DateTime<Utc>,
) -> Result<Answered, RequestError> {
    if !module.in_final_round || module.is_completed {
        return Err(RequestError::NotFound("Final round"));
    }

    let mut queue = QuestionQueue::ordered(module.final_round_word_ids.iter().copied());
    if queue.head() != Some(word_id) {
        return Err(RequestError::BadRequest(format!(
            "Word {word_id} is not the current final round question"
        )));
    }
    if correct {
        queue.pop();
    } else {
        queue.requeue();
    }
    module.final_round_word_ids = queue.to_vec();

    let complete = queue.is_empty();
    if complete {
        tracing::info!("final round of module {} complete", module.module_id);
        progress::mark_complete(module, now);
    }
    Ok(Answered {
        next: queue.head(),
        remaining: queue.len(),
        complete,
    })
}
