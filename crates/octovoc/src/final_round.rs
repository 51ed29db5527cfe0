//! The final round of a module, drilling the words a student missed in its batteries.

use crate::{
    api::ProgressApi,
    context::FeedbackTiming,
    error::SessionResult,
    feedback::{AnswerGate, DwellTicket, Feedback, RoundStep, Submission},
};
use octovoc_api::response::{FinalRoundResult, Quote};
use octovoc_core::{
    sentence::{Presentation, SentenceView},
    should_submit, ModuleId, Word,
};
use std::{future::Future, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalRoundState {
    NotStarted,
    Practicing,
    /// The module is complete, with its reward.
    Complete(Option<Quote>),
    Redirected,
    Cancelled,
}

/// A logged in student's final round. The server keeps the queue and grades the answers.
#[derive(Debug)]
pub struct FinalRound<A> {
    api: A,
    module_id: ModuleId,
    timing: FeedbackTiming,
    state: FinalRoundState,
    current: Option<Word>,
    total: usize,
    remaining: usize,
    gate: AnswerGate<FinalRoundResult>,
}

impl<A: ProgressApi> FinalRound<A> {
    pub fn new(api: A, module_id: ModuleId, timing: FeedbackTiming) -> Self {
        Self {
            api,
            module_id,
            timing,
            state: FinalRoundState::NotStarted,
            current: None,
            total: 0,
            remaining: 0,
            gate: AnswerGate::default(),
        }
    }

    /// Starts or resumes the final round. An empty round completes the module right away.
    pub async fn start(&mut self) -> SessionResult<&FinalRoundState> {
        if self.state != FinalRoundState::NotStarted {
            return Ok(&self.state);
        }

        tracing::info!("starting final round of module {}", self.module_id);
        let start = self.api.start_final_round(self.module_id).await?;
        self.total = start.total_words;
        self.remaining = start.remaining;
        match start.current_word {
            Some(word) if !start.completed => {
                self.current = Some(word);
                self.state = FinalRoundState::Practicing;
            }
            _ if start.completed || start.remaining == 0 => self.complete().await?,
            _ => {
                tracing::error!("final round has {} words left but no current word", start.remaining);
                self.redirect();
            }
        }
        Ok(&self.state)
    }

    pub fn state(&self) -> &FinalRoundState {
        &self.state
    }

    pub fn current_word(&self) -> Option<&Word> {
        match self.state {
            FinalRoundState::Practicing => self.current.as_ref(),
            _ => None,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.gate.feedback()
    }

    pub fn sentence(&self) -> Option<SentenceView> {
        let word = self.current_word()?;
        Some(SentenceView::render(
            &word.example_sentence,
            &word.word,
            Presentation::Blank,
        ))
    }

    pub async fn type_input(&mut self, input: &str) -> SessionResult<Submission> {
        if !self.gate.is_open() {
            return Ok(Submission::Ignored);
        }
        let Some(word) = self.current_word() else {
            return Ok(Submission::Ignored);
        };
        if !should_submit(input, &word.word, word.case_sensitive).submit {
            return Ok(Submission::Waiting);
        }
        self.submit_answer(input).await
    }

    pub async fn submit_answer(&mut self, answer: &str) -> SessionResult<Submission> {
        let Some(word_id) = self.current_word().map(|w| w.id) else {
            return Ok(Submission::Ignored);
        };
        if !self.gate.is_open() {
            return Ok(Submission::Ignored);
        }

        let result = match self
            .api
            .answer_final_round(self.module_id, word_id, answer)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                tracing::error!("failed to submit final round answer: {err}");
                return Err(err.into());
            }
        };
        tracing::info!(
            "final round word {word_id} answered, correct: {}, {} left",
            result.is_correct,
            result.remaining
        );

        let feedback = Feedback {
            correct: result.is_correct,
            given_answer: answer.to_string(),
            correct_answer: result.correct_answer.clone(),
            dwell: self.timing.dwell(result.is_correct, true),
        };
        let ticket = self.gate.show(feedback.clone(), result);
        Ok(Submission::Answered { feedback, ticket })
    }

    pub async fn settle(&mut self, ticket: DwellTicket) -> SessionResult<RoundStep> {
        let Some(result) = self.gate.take(ticket) else {
            return Ok(RoundStep::Stale);
        };
        self.remaining = result.remaining;

        if result.final_round_complete {
            self.complete().await?;
            return Ok(RoundStep::Complete);
        }
        match result.next_word {
            Some(word) => {
                self.current = Some(word);
                Ok(RoundStep::NextWord)
            }
            None => {
                tracing::error!("final round is not complete but has no next word");
                self.redirect();
                Ok(RoundStep::Redirected)
            }
        }
    }

    pub async fn settle_after<S, F>(
        &mut self,
        ticket: DwellTicket,
        sleep: S,
    ) -> SessionResult<RoundStep>
    where
        S: FnOnce(Duration) -> F,
        F: Future<Output = ()>,
    {
        let Some(dwell) = self.gate.feedback_for(ticket).map(|f| f.dwell) else {
            return Ok(RoundStep::Stale);
        };
        sleep(dwell).await;
        self.settle(ticket).await
    }

    pub fn cancel(&mut self) {
        self.gate.close();
        self.state = FinalRoundState::Cancelled;
    }

    fn redirect(&mut self) {
        self.gate.close();
        self.state = FinalRoundState::Redirected;
    }

    async fn complete(&mut self) -> SessionResult<()> {
        let completion = self.api.complete_module(self.module_id).await?;
        tracing::info!("module {} complete", self.module_id);
        self.current = None;
        self.state = FinalRoundState::Complete(completion.quote);
        Ok(())
    }
}
