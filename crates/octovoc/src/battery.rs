//! The phase state machine of a single battery.
//!
//! Guests run it in the browser through the local backend, the server runs it for students.

use crate::{error::SessionError, queue::QuestionQueue};
use octovoc_core::{BatteryId, Phase, WordId};
use std::collections::HashSet;

/// What happens after an answer was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The phase continues with the given word.
    Next(WordId),
    /// The previous phase is done and `phase` starts with `next`.
    PhaseComplete { phase: Phase, next: WordId },
    /// Phase 3 is done.
    BatteryComplete,
}

#[derive(Debug, Clone)]
pub struct BatteryRun {
    battery_id: BatteryId,
    word_ids: Vec<WordId>,
    phase: Phase,
    queue: QuestionQueue,
    /// Words that are done for the current phase.
    settled: HashSet<WordId>,
    complete: bool,
}

impl BatteryRun {
    /// Starts the battery at phase 1 with a shuffled queue.
    pub fn start(battery_id: BatteryId, word_ids: Vec<WordId>) -> Self {
        let queue = QuestionQueue::shuffled(word_ids.iter().copied());
        let complete = word_ids.is_empty();
        tracing::debug!("starting battery {battery_id} with queue {:?}", queue.to_vec());
        Self {
            battery_id,
            word_ids,
            phase: Phase::Recognition,
            queue,
            settled: HashSet::new(),
            complete,
        }
    }

    /// Continues a battery from a stored phase and queue.
    ///
    /// Battery words missing from the queue count as settled for the phase.
    pub fn resume(
        battery_id: BatteryId,
        word_ids: Vec<WordId>,
        phase: Phase,
        queue: Vec<WordId>,
        complete: bool,
    ) -> Self {
        let queue = QuestionQueue::ordered(queue);
        let settled = word_ids
            .iter()
            .copied()
            .filter(|id| !queue.contains(*id))
            .collect();
        Self {
            battery_id,
            word_ids,
            phase,
            queue,
            settled,
            complete,
        }
    }

    pub fn battery_id(&self) -> BatteryId {
        self.battery_id
    }

    pub fn word_ids(&self) -> &[WordId] {
        &self.word_ids
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn queue(&self) -> &QuestionQueue {
        &self.queue
    }

    pub fn current(&self) -> Option<WordId> {
        if self.complete {
            None
        } else {
            self.queue.head()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether `word_id` is done for the current phase.
    pub fn is_settled(&self, word_id: WordId) -> bool {
        self.settled.contains(&word_id)
    }

    /// Records the answer to the current word.
    ///
    /// Phases 1 and 2 ask every word once. Phase 3 sends misses to the back of the queue, so it only
    /// ends once every word was answered correctly.
    pub fn record(&mut self, word_id: WordId, correct: bool) -> Result<Transition, SessionError> {
        if self.current() != Some(word_id) {
            return Err(SessionError::NotCurrentWord(word_id));
        }

        if correct || !self.phase.requeues_misses() {
            self.queue.pop();
            self.settled.insert(word_id);
        } else {
            self.queue.requeue();
        }

        if let Some(next) = self.queue.head() {
            return Ok(Transition::Next(next));
        }

        debug_assert!(self.word_ids.iter().all(|id| self.settled.contains(id)));
        match self.phase.next() {
            Some(phase) => {
                tracing::info!("battery {} advancing to phase {phase}", self.battery_id);
                self.phase = phase;
                self.queue = QuestionQueue::shuffled(self.word_ids.iter().copied());
                self.settled.clear();
                let next = self
                    .queue
                    .head()
                    .ok_or(SessionError::EmptyBattery(self.battery_id))?;
                Ok(Transition::PhaseComplete { phase, next })
            }
            None => {
                tracing::info!("battery {} complete", self.battery_id);
                self.complete = true;
                Ok(Transition::BatteryComplete)
            }
        }
    }
}
