//! Practising the words in a student's difficult words pool.
//!
//! A word leaves the pool when it is answered correctly the first time it comes up in a practice
//! session. Every other answer sends it to the back of the queue.

use crate::{
    api::ProgressApi,
    context::FeedbackTiming,
    error::SessionResult,
    feedback::{AnswerGate, DwellTicket, Feedback, RoundStep, Submission},
    queue::QuestionQueue,
};
use octovoc_core::{
    answer,
    sentence::{Presentation, SentenceView},
    should_submit, DifficultWord, WordId,
};
use std::{collections::HashSet, future::Future, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillOutcome {
    /// Answered correctly on the first attempt and removed from the pool.
    Mastered(WordId),
    Requeued(WordId),
}

/// The requeue loop over a difficult words pool.
#[derive(Debug, Clone, Default)]
pub struct DifficultWordsDrill {
    pool: Vec<DifficultWord>,
    queue: QuestionQueue,
    attempted: HashSet<WordId>,
    /// Words whose latest answer in this session was correct after an earlier miss.
    recalled: HashSet<WordId>,
}

impl DifficultWordsDrill {
    pub fn new(pool: Vec<DifficultWord>) -> Self {
        let queue = pool.iter().map(|w| w.word_id).collect();
        Self {
            pool,
            queue,
            attempted: HashSet::new(),
            recalled: HashSet::new(),
        }
    }

    /// Starts a new practice session over the words left in the pool.
    pub fn restart(&mut self) {
        self.queue = self.pool.iter().map(|w| w.word_id).collect();
        self.attempted.clear();
        self.recalled.clear();
    }

    pub fn pool(&self) -> &[DifficultWord] {
        &self.pool
    }

    pub fn queue(&self) -> &QuestionQueue {
        &self.queue
    }

    pub fn current(&self) -> Option<&DifficultWord> {
        let head = self.queue.head()?;
        self.pool.iter().find(|w| w.word_id == head)
    }

    /// Records an answer to `word_id`, which has to be the current word.
    pub fn record(&mut self, word_id: WordId, correct: bool) -> Option<DrillOutcome> {
        if self.queue.head() != Some(word_id) {
            return None;
        }

        let first_attempt = self.attempted.insert(word_id);
        if correct && first_attempt {
            self.queue.pop();
            self.pool.retain(|w| w.word_id != word_id);
            Some(DrillOutcome::Mastered(word_id))
        } else {
            if correct {
                self.recalled.insert(word_id);
            } else {
                self.recalled.remove(&word_id);
            }
            self.queue.requeue();
            Some(DrillOutcome::Requeued(word_id))
        }
    }

    /// Takes a word out of the pool by hand.
    pub fn remove(&mut self, word_id: WordId) -> Option<DifficultWord> {
        self.queue.remove(word_id);
        let position = self.pool.iter().position(|w| w.word_id == word_id)?;
        Some(self.pool.remove(position))
    }

    /// Done once nothing is queued or every queued word has been recalled in this session.
    pub fn is_complete(&self) -> bool {
        self.queue.iter().all(|id| self.recalled.contains(&id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillState {
    NotStarted,
    Practicing,
    Complete,
    Cancelled,
}

/// Difficult words practice for a logged in student.
///
/// Answers are graded locally. Mastered words are removed from the pool on the server.
#[derive(Debug)]
pub struct DifficultWordsPractice<A> {
    api: A,
    timing: FeedbackTiming,
    drill: DifficultWordsDrill,
    state: DrillState,
    gate: AnswerGate<(WordId, bool)>,
}

impl<A: ProgressApi> DifficultWordsPractice<A> {
    /// Fetches the student's pool.
    pub async fn load(api: A, timing: FeedbackTiming) -> SessionResult<Self> {
        tracing::info!("fetching difficult words");
        let pool = api.difficult_words().await?;
        tracing::info!("{} difficult words", pool.len());
        Ok(Self {
            api,
            timing,
            drill: DifficultWordsDrill::new(pool),
            state: DrillState::NotStarted,
            gate: AnswerGate::default(),
        })
    }

    pub fn pool(&self) -> &[DifficultWord] {
        self.drill.pool()
    }

    pub fn state(&self) -> DrillState {
        self.state
    }

    /// Starts a practice session, forgetting the attempts of any previous one.
    pub fn start(&mut self) -> DrillState {
        if self.state == DrillState::Cancelled {
            return self.state;
        }
        self.drill.restart();
        self.gate = AnswerGate::default();
        self.state = if self.drill.is_complete() {
            DrillState::Complete
        } else {
            DrillState::Practicing
        };
        self.state
    }

    pub fn current_word(&self) -> Option<&DifficultWord> {
        match self.state {
            DrillState::Practicing => self.drill.current(),
            _ => None,
        }
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.gate.feedback()
    }

    pub fn sentence(&self) -> Option<SentenceView> {
        let word = &self.current_word()?.word;
        Some(SentenceView::render(
            &word.example_sentence,
            &word.word,
            Presentation::Blank,
        ))
    }

    /// Removes a word from the pool on request of the student.
    pub async fn remove(&mut self, word_id: WordId) -> SessionResult<()> {
        tracing::info!("removing difficult word {word_id}");
        self.api.remove_difficult_word(word_id).await?;
        self.drill.remove(word_id);
        if self.state == DrillState::Practicing
            && self.gate.is_open()
            && self.drill.is_complete()
        {
            self.state = DrillState::Complete;
        }
        Ok(())
    }

    pub fn type_input(&mut self, input: &str) -> Submission {
        if !self.gate.is_open() {
            return Submission::Ignored;
        }
        let Some(word) = self.current_word() else {
            return Submission::Ignored;
        };
        let word = &word.word;
        if !should_submit(input, &word.word, word.case_sensitive).submit {
            return Submission::Waiting;
        }
        self.submit_answer(input)
    }

    pub fn submit_answer(&mut self, given: &str) -> Submission {
        if !self.gate.is_open() {
            return Submission::Ignored;
        }
        let Some(current) = self.current_word() else {
            return Submission::Ignored;
        };

        let correct = answer::is_correct_typed(&current.word, given);
        let word_id = current.word_id;
        let feedback = Feedback {
            correct,
            given_answer: given.to_string(),
            correct_answer: current.word.word.clone(),
            dwell: self.timing.dwell(correct, true),
        };
        tracing::debug!("difficult word {word_id} answered, correct: {correct}");
        let ticket = self.gate.show(feedback.clone(), (word_id, correct));
        Submission::Answered { feedback, ticket }
    }

    pub async fn settle(&mut self, ticket: DwellTicket) -> RoundStep {
        let Some((word_id, correct)) = self.gate.take(ticket) else {
            return RoundStep::Stale;
        };

        if let Some(DrillOutcome::Mastered(word_id)) = self.drill.record(word_id, correct) {
            tracing::info!("difficult word {word_id} mastered");
            if let Err(err) = self.api.remove_difficult_word(word_id).await {
                tracing::error!("failed to remove difficult word {word_id}: {err}");
            }
        }

        if self.drill.is_complete() {
            tracing::info!("difficult words practice complete");
            self.state = DrillState::Complete;
            RoundStep::Complete
        } else {
            RoundStep::NextWord
        }
    }

    pub async fn settle_after<S, F>(&mut self, ticket: DwellTicket, sleep: S) -> RoundStep
    where
        S: FnOnce(Duration) -> F,
        F: Future<Output = ()>,
    {
        let Some(dwell) = self.gate.feedback_for(ticket).map(|f| f.dwell) else {
            return RoundStep::Stale;
        };
        sleep(dwell).await;
        self.settle(ticket).await
    }

    pub fn cancel(&mut self) {
        self.gate.close();
        self.state = DrillState::Cancelled;
    }
}
