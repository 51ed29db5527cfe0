//! A student practising the batteries of a module.

use crate::{
    backend::{AnswerOutcome, BatteryState, ModulePlan, NextStep, ProgressBackend},
    context::SessionContext,
    error::{SessionError, SessionResult},
    feedback::{AnswerGate, DwellTicket, Feedback, Submission},
    history::ProgressHistory,
};
use octovoc_api::response::Quote;
use octovoc_core::{
    answer,
    sentence::{Presentation, SentenceView},
    should_submit, BatteryId, ModuleId, Phase, Word,
};
use std::{future::Future, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Practicing(Phase),
    /// The next battery could not be started yet.
    BatteryComplete,
    ModuleComplete(Completion),
    /// The session cannot continue and the student should be sent back to the dashboard.
    Redirected,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The student's final round is waiting.
    FinalRound,
    Reward(Option<Quote>),
}

/// What settling a ticket did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The ticket was no longer current and nothing happened.
    Stale,
    NextWord,
    PhaseComplete(Phase),
    NextBattery(BatteryId),
    ModuleComplete(Completion),
    Redirected,
}

/// Drives a module from battery to battery through a [`ProgressBackend`].
///
/// Answers are accepted one at a time. After an answer the feedback stays up until the returned
/// [`DwellTicket`] is settled, which is when the session moves on to the next word.
#[derive(Debug)]
pub struct PracticeSession<B> {
    backend: B,
    context: SessionContext,
    module_id: ModuleId,
    state: SessionState,
    battery: Option<BatteryState>,
    history: ProgressHistory,
    gate: AnswerGate<AnswerOutcome>,
}

impl<B: ProgressBackend> PracticeSession<B> {
    pub fn new(backend: B, context: SessionContext, module_id: ModuleId) -> Self {
        Self {
            backend,
            context,
            module_id,
            state: SessionState::NotStarted,
            battery: None,
            history: ProgressHistory::default(),
            gate: AnswerGate::default(),
        }
    }

    /// Starts the module, or retries starting the next battery after a failure.
    pub async fn start(&mut self) -> SessionResult<&SessionState> {
        match self.state {
            SessionState::NotStarted => {
                tracing::info!(
                    "starting module {} in {:?} mode",
                    self.module_id,
                    self.backend.mode()
                );
                self.advance(false).await?;
            }
            SessionState::BatteryComplete => {
                self.advance(true).await?;
            }
            _ => {}
        }
        Ok(&self.state)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Option<Phase> {
        match self.state {
            SessionState::Practicing(phase) => Some(phase),
            _ => None,
        }
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.phase()?;
        self.battery.as_ref()?.current_word.as_ref()
    }

    /// The words of the current battery.
    pub fn battery_words(&self) -> &[Word] {
        self.battery
            .as_ref()
            .map(|battery| battery.words.as_slice())
            .unwrap_or_default()
    }

    pub fn history(&self) -> &ProgressHistory {
        &self.history
    }

    /// The feedback to the last answer while it is showing.
    pub fn feedback(&self) -> Option<&Feedback> {
        self.gate.feedback()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The options to pick from in phases 1 and 2, in battery order.
    ///
    /// Meanings in phase 1, word forms in phase 2. Always includes the correct answer.
    pub fn choices(&self) -> Vec<&str> {
        let (Some(phase), Some(word)) = (self.phase(), self.current_word()) else {
            return Vec::new();
        };
        if phase.is_typed() || self.context.max_choices == 0 {
            return Vec::new();
        }

        let words = self.battery_words();
        let mut picked = words
            .iter()
            .filter(|w| w.id != word.id)
            .take(self.context.max_choices - 1)
            .collect::<Vec<_>>();
        let position = words
            .iter()
            .position(|w| w.id == word.id)
            .unwrap_or_default()
            .min(picked.len());
        picked.insert(position, word);
        picked
            .into_iter()
            .map(|w| answer::expected_answer(w, phase))
            .collect()
    }

    /// The current word's example sentence as it should be shown in this phase.
    pub fn sentence(&self) -> Option<SentenceView> {
        let phase = self.phase()?;
        let word = self.current_word()?;
        Some(SentenceView::render(
            &word.example_sentence,
            &word.word,
            Presentation::for_phase(phase),
        ))
    }

    /// Handles a change to the typed answer in phase 3, submitting it once the matcher decides to.
    pub async fn type_input(&mut self, input: &str) -> SessionResult<Submission> {
        if self.phase() != Some(Phase::FreeProduction) || !self.gate.is_open() {
            return Ok(Submission::Ignored);
        }
        let Some(word) = self.current_word() else {
            return Ok(Submission::Ignored);
        };
        let decision = should_submit(input, &word.word, word.case_sensitive);
        if !decision.submit {
            return Ok(Submission::Waiting);
        }
        self.submit_answer(input).await
    }

    /// Submits an answer to the current word.
    ///
    /// Ignored while feedback is showing. A failed submission leaves the session on the same word.
    pub async fn submit_answer(&mut self, answer: &str) -> SessionResult<Submission> {
        let Some(phase) = self.phase() else {
            return Ok(Submission::Ignored);
        };
        let Some(word_id) = self.current_word().map(|w| w.id) else {
            return Ok(Submission::Ignored);
        };
        if !self.gate.is_open() {
            tracing::debug!("ignoring answer while feedback is showing");
            return Ok(Submission::Ignored);
        }

        match self.backend.submit_answer(word_id, answer).await {
            Ok(outcome) => {
                tracing::info!(
                    "word {word_id} answered in phase {phase}, correct: {}",
                    outcome.correct
                );
                self.history.record(outcome.correct);
                let feedback = Feedback {
                    correct: outcome.correct,
                    given_answer: answer.to_string(),
                    correct_answer: outcome.correct_answer.clone(),
                    dwell: self.context.timing.dwell(outcome.correct, phase.is_typed()),
                };
                let ticket = self.gate.show(feedback.clone(), outcome);
                Ok(Submission::Answered { feedback, ticket })
            }
            Err(SessionError::UnexpectedResponse(message)) => {
                tracing::error!("unexpected response to answer: {message}");
                self.redirect();
                Ok(Submission::Redirected)
            }
            Err(err) => {
                tracing::error!("failed to submit answer: {err}");
                Err(err)
            }
        }
    }

    /// Moves on from the feedback belonging to `ticket`.
    pub async fn settle(&mut self, ticket: DwellTicket) -> SessionResult<Step> {
        let Some(outcome) = self.gate.take(ticket) else {
            tracing::debug!("ignoring stale ticket");
            return Ok(Step::Stale);
        };
        self.battery = self.backend.current_state().cloned();

        match outcome.next {
            NextStep::Word => Ok(Step::NextWord),
            NextStep::PhaseComplete(phase) => {
                tracing::info!("phase {phase} started");
                self.history.reset(self.battery_words().len());
                self.state = SessionState::Practicing(phase);
                Ok(Step::PhaseComplete(phase))
            }
            NextStep::BatteryComplete => {
                tracing::info!("battery complete");
                self.state = SessionState::BatteryComplete;
                self.advance(true).await
            }
        }
    }

    /// Waits out the feedback's dwell time with `sleep` and settles the ticket.
    ///
    /// A stale ticket returns right away.
    pub async fn settle_after<S, F>(&mut self, ticket: DwellTicket, sleep: S) -> SessionResult<Step>
    where
        S: FnOnce(Duration) -> F,
        F: Future<Output = ()>,
    {
        let Some(dwell) = self.gate.feedback_for(ticket).map(|f| f.dwell) else {
            return Ok(Step::Stale);
        };
        sleep(dwell).await;
        self.settle(ticket).await
    }

    /// Abandons the session. Outstanding tickets become stale and every input is ignored.
    pub fn cancel(&mut self) {
        tracing::info!("cancelling session for module {}", self.module_id);
        self.gate.close();
        self.state = SessionState::Cancelled;
    }

    fn redirect(&mut self) {
        self.gate.close();
        self.state = SessionState::Redirected;
    }

    /// Asks the backend what comes next in the module and enters it.
    async fn advance(&mut self, after_battery: bool) -> SessionResult<Step> {
        let mut skipped = Vec::new();
        loop {
            match self.backend.start_module(self.module_id).await? {
                ModulePlan::Battery(battery_id) => {
                    if skipped.contains(&battery_id) {
                        return Err(SessionError::EmptyBattery(battery_id));
                    }
                    let battery = self.backend.start_battery(battery_id).await?;
                    if battery.current_word.is_none() {
                        tracing::warn!("skipping battery {battery_id} without questions");
                        skipped.push(battery_id);
                        continue;
                    }

                    tracing::info!("practising battery {battery_id} from phase {}", battery.phase);
                    self.history.reset(battery.words.len());
                    self.state = SessionState::Practicing(battery.phase);
                    self.battery = Some(battery);
                    return Ok(Step::NextBattery(battery_id));
                }
                ModulePlan::FinalRound => {
                    tracing::info!("module {} waiting for the final round", self.module_id);
                    return Ok(self.complete(Completion::FinalRound));
                }
                ModulePlan::Completed if after_battery || !skipped.is_empty() => {
                    let quote = self.backend.reward(self.module_id).await?;
                    tracing::info!("module {} complete", self.module_id);
                    return Ok(self.complete(Completion::Reward(quote)));
                }
                ModulePlan::Completed => {
                    tracing::info!("module {} was already completed", self.module_id);
                    self.redirect();
                    return Ok(Step::Redirected);
                }
            }
        }
    }

    fn complete(&mut self, completion: Completion) -> Step {
        self.battery = None;
        self.state = SessionState::ModuleComplete(completion.clone());
        Step::ModuleComplete(completion)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        api::ApiError,
        backend::{LocalBackend, ServerBackend},
        testing::*,
    };
    use octovoc_api::response as res;
    use std::{cell::Cell, rc::Rc};

    fn guest() -> SessionContext {
        SessionContext::guest(Some(1), true)
    }

    async fn answer_current<B: ProgressBackend>(session: &mut PracticeSession<B>, correct: bool) -> Step {
        let phase = session.phase().unwrap();
        let word = session.current_word().unwrap().clone();
        let given = if correct {
            answer::expected_answer(&word, phase).to_string()
        } else {
            "fout".to_string()
        };
        let Submission::Answered { ticket, .. } = session.submit_answer(&given).await.unwrap() else {
            panic!("answer was not accepted");
        };
        session.settle(ticket).await.unwrap()
    }

    #[tokio::test]
    async fn guest_runs_through_module() {
        init_logging();
        let content = FakeContent::module(1, &[(10, &[1, 2, 3, 4, 5]), (20, &[6, 7])]);
        let mut session = PracticeSession::new(LocalBackend::new(&content), guest(), 1);
        assert_eq!(
            session.start().await.unwrap(),
            &SessionState::Practicing(Phase::Recognition)
        );

        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(session.current_word().unwrap().id);
            assert_eq!(answer_current(&mut session, true).await, Step::NextWord);
        }
        seen.push(session.current_word().unwrap().id);
        assert_eq!(
            answer_current(&mut session, true).await,
            Step::PhaseComplete(Phase::CuedRecall)
        );
        seen.sort();
        assert_eq!(seen, [1, 2, 3, 4, 5]);
        assert_eq!(session.history().correct(), 0);

        for _ in 0..5 {
            answer_current(&mut session, true).await;
        }
        assert_eq!(session.phase(), Some(Phase::FreeProduction));
        for _ in 0..4 {
            answer_current(&mut session, true).await;
        }
        assert_eq!(answer_current(&mut session, true).await, Step::NextBattery(20));
        assert_eq!(session.battery_words().len(), 2);

        for _ in 0..5 {
            answer_current(&mut session, true).await;
        }
        let step = answer_current(&mut session, true).await;
        let completion = Completion::Reward(Some(quote()));
        assert_eq!(step, Step::ModuleComplete(completion.clone()));
        assert_eq!(session.state(), &SessionState::ModuleComplete(completion));
        assert_eq!(session.current_word(), None);
    }

    #[tokio::test]
    async fn ignores_answers_while_feedback_shows() {
        let content = FakeContent::module(1, &[(10, &[1, 2])]);
        let mut session = PracticeSession::new(LocalBackend::new(&content), guest(), 1);
        session.start().await.unwrap();

        let first = session.current_word().unwrap().id;
        let Submission::Answered { feedback, ticket } = session.submit_answer("fout").await.unwrap() else {
            panic!("answer was not accepted");
        };
        assert!(!feedback.correct);
        assert_eq!(feedback.dwell, Duration::from_millis(800));
        assert_eq!(session.submit_answer("fout").await.unwrap(), Submission::Ignored);
        assert_eq!(session.current_word().unwrap().id, first);
        assert_eq!(session.history().slots().len(), 2);

        assert_eq!(session.settle(ticket).await.unwrap(), Step::NextWord);
        assert_ne!(session.current_word().unwrap().id, first);
        assert_eq!(session.settle(ticket).await.unwrap(), Step::Stale);
    }

    #[tokio::test]
    async fn typing_submits_when_matcher_decides() {
        let content = FakeContent::module(1, &[(10, &[1, 2])]);
        let mut session = PracticeSession::new(LocalBackend::new(&content), guest(), 1);
        session.start().await.unwrap();
        assert_eq!(session.type_input("woord").await.unwrap(), Submission::Ignored);
        for _ in 0..4 {
            answer_current(&mut session, true).await;
        }
        assert_eq!(session.phase(), Some(Phase::FreeProduction));
        assert!(session.choices().is_empty());

        let word = session.current_word().unwrap().clone();
        assert_eq!(session.type_input("wo").await.unwrap(), Submission::Waiting);
        assert_eq!(session.type_input("woord").await.unwrap(), Submission::Waiting);
        let Submission::Answered { feedback, .. } = session.type_input(&word.word).await.unwrap() else {
            panic!("typed answer was not submitted");
        };
        assert!(feedback.correct);
        assert_eq!(feedback.correct_answer, word.word);
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_typed_answer_dwells_longer() {
        let content = FakeContent::module(1, &[(10, &[1, 2])]);
        let mut session = PracticeSession::new(LocalBackend::new(&content), guest(), 1);
        session.start().await.unwrap();
        for _ in 0..4 {
            answer_current(&mut session, true).await;
        }

        let missed = session.current_word().unwrap().id;
        let Submission::Answered { ticket, feedback } = session.type_input("xyzxyz").await.unwrap() else {
            panic!("typed answer was not submitted");
        };
        assert!(!feedback.correct);

        let started = tokio::time::Instant::now();
        let step = session.settle_after(ticket, tokio::time::sleep).await.unwrap();
        assert_eq!(step, Step::NextWord);
        assert!(started.elapsed() >= Duration::from_millis(3000));
        assert_ne!(session.current_word().unwrap().id, missed);
        assert_eq!(
            session.backend().current_state().unwrap().queue.last(),
            Some(&missed)
        );
    }

    #[tokio::test]
    async fn cancelled_session_ignores_everything() {
        let content = FakeContent::module(1, &[(10, &[1, 2])]);
        let mut session = PracticeSession::new(LocalBackend::new(&content), guest(), 1);
        session.start().await.unwrap();
        let first = session.current_word().unwrap().id;
        let Submission::Answered { ticket, .. } = session.submit_answer("fout").await.unwrap() else {
            panic!("answer was not accepted");
        };

        session.cancel();
        let slept = Rc::new(Cell::new(false));
        let step = session
            .settle_after(ticket, |_| {
                let slept = slept.clone();
                async move { slept.set(true) }
            })
            .await
            .unwrap();
        assert_eq!(step, Step::Stale);
        assert!(!slept.get());
        assert_eq!(session.state(), &SessionState::Cancelled);
        assert_eq!(session.submit_answer("fout").await.unwrap(), Submission::Ignored);
        assert_eq!(session.backend().current_state().unwrap().queue.len(), 1);
        assert_ne!(session.backend().current_state().unwrap().queue[0], first);
    }

    #[tokio::test]
    async fn choices_contain_correct_answer() {
        let content = FakeContent::module(1, &[(10, &[1, 2, 3, 4, 5, 6, 7])]);
        let mut session = PracticeSession::new(LocalBackend::new(&content), guest(), 1);
        session.start().await.unwrap();

        let word = session.current_word().unwrap().clone();
        let choices = session.choices();
        assert_eq!(choices.len(), 5);
        assert!(choices.contains(&word.meaning.as_str()));

        let Some(SentenceView::Underlined { term, .. }) = session.sentence() else {
            panic!("phase 1 sentence should be underlined");
        };
        assert_eq!(term, word.word);
    }

    #[tokio::test]
    async fn authenticated_module_ends_in_final_round() {
        init_logging();
        let api = ScriptedProgress::default();
        ScriptedProgress::script(&api.module_starts, Ok(module_progress(1, Some(7), false)));
        ScriptedProgress::script(&api.battery_starts, Ok(battery_start(7, Phase::FreeProduction, vec![1])));
        ScriptedProgress::script(
            &api.answers,
            Ok(res::AnswerResult {
                is_correct: true,
                correct_answer: "woord1".to_string(),
                battery_progress: None,
                next_word: None,
                phase_complete: false,
                battery_complete: true,
            }),
        );
        ScriptedProgress::script(&api.module_starts, Ok(module_progress(1, None, true)));

        let mut session =
            PracticeSession::new(ServerBackend::new(&api), SessionContext::student(3), 1);
        assert_eq!(
            session.start().await.unwrap(),
            &SessionState::Practicing(Phase::FreeProduction)
        );
        let Some(SentenceView::Blanked { .. }) = session.sentence() else {
            panic!("phase 3 sentence should be blanked");
        };
        assert_eq!(
            answer_current(&mut session, true).await,
            Step::ModuleComplete(Completion::FinalRound)
        );
    }

    #[tokio::test]
    async fn failed_submission_stays_on_word() {
        let api = ScriptedProgress::default();
        ScriptedProgress::script(&api.module_starts, Ok(module_progress(1, Some(7), false)));
        ScriptedProgress::script(&api.battery_starts, Ok(battery_start(7, Phase::Recognition, vec![1, 2])));
        ScriptedProgress::script(&api.answers, Err(ApiError::new("Failed to fetch")));
        ScriptedProgress::script(&api.answers, Ok(next_word(true, battery_progress(7, Phase::Recognition, vec![2]))));

        let mut session =
            PracticeSession::new(ServerBackend::new(&api), SessionContext::student(3), 1);
        session.start().await.unwrap();
        assert!(session.submit_answer("betekenis 1").await.is_err());
        assert_eq!(session.current_word().unwrap().id, 1);
        assert!(session.feedback().is_none());

        assert_eq!(answer_current(&mut session, true).await, Step::NextWord);
        assert_eq!(session.current_word().unwrap().id, 2);
        assert_eq!(api.submitted.borrow().len(), 2);
    }

    #[tokio::test]
    async fn unexpected_response_redirects() {
        let api = ScriptedProgress::default();
        ScriptedProgress::script(&api.module_starts, Ok(module_progress(1, Some(7), false)));
        ScriptedProgress::script(&api.battery_starts, Ok(battery_start(7, Phase::Recognition, vec![1, 2])));
        ScriptedProgress::script(
            &api.answers,
            Ok(res::AnswerResult {
                is_correct: true,
                correct_answer: "betekenis 1".to_string(),
                battery_progress: None,
                next_word: None,
                phase_complete: false,
                battery_complete: false,
            }),
        );

        let mut session =
            PracticeSession::new(ServerBackend::new(&api), SessionContext::student(3), 1);
        session.start().await.unwrap();
        assert_eq!(
            session.submit_answer("betekenis 1").await.unwrap(),
            Submission::Redirected
        );
        assert_eq!(session.state(), &SessionState::Redirected);
    }

    #[tokio::test]
    async fn completed_module_redirects() {
        let api = ScriptedProgress::default();
        let mut progress = module_progress(1, None, false);
        progress.is_completed = true;
        ScriptedProgress::script(&api.module_starts, Ok(progress));

        let mut session =
            PracticeSession::new(ServerBackend::new(&api), SessionContext::student(3), 1);
        assert_eq!(session.start().await.unwrap(), &SessionState::Redirected);
    }

    #[tokio::test]
    async fn failed_battery_hand_over_can_be_retried() {
        init_logging();
        let api = ScriptedProgress::default();
        ScriptedProgress::script(&api.module_starts, Ok(module_progress(1, Some(7), false)));
        ScriptedProgress::script(&api.battery_starts, Ok(battery_start(7, Phase::FreeProduction, vec![1])));
        ScriptedProgress::script(
            &api.answers,
            Ok(res::AnswerResult {
                is_correct: true,
                correct_answer: "woord1".to_string(),
                battery_progress: None,
                next_word: None,
                phase_complete: false,
                battery_complete: true,
            }),
        );
        ScriptedProgress::script(&api.module_starts, Err(ApiError::new("Failed to fetch")));
        ScriptedProgress::script(&api.module_starts, Ok(module_progress(1, Some(8), false)));
        ScriptedProgress::script(&api.battery_starts, Ok(battery_start(8, Phase::Recognition, vec![4, 5])));

        let mut session =
            PracticeSession::new(ServerBackend::new(&api), SessionContext::student(3), 1);
        session.start().await.unwrap();
        let Submission::Answered { ticket, .. } = session.type_input("woord1").await.unwrap() else {
            panic!("typed answer was not submitted");
        };
        assert!(session.settle(ticket).await.is_err());
        assert_eq!(session.state(), &SessionState::BatteryComplete);

        assert_eq!(
            session.start().await.unwrap(),
            &SessionState::Practicing(Phase::Recognition)
        );
        assert_eq!(session.current_word().unwrap().id, 4);
    }

    #[tokio::test]
    async fn authenticated_empty_battery_is_skipped() {
        let api = ScriptedProgress::default();
        ScriptedProgress::script(&api.module_starts, Ok(module_progress(1, Some(7), false)));
        let mut empty = battery_start(7, Phase::Recognition, vec![]);
        empty.battery_progress.is_completed = true;
        ScriptedProgress::script(&api.battery_starts, Ok(empty));
        ScriptedProgress::script(&api.module_starts, Ok(module_progress(1, Some(8), false)));
        ScriptedProgress::script(&api.battery_starts, Ok(battery_start(8, Phase::Recognition, vec![4, 5])));

        let mut session =
            PracticeSession::new(ServerBackend::new(&api), SessionContext::student(3), 1);
        assert_eq!(
            session.start().await.unwrap(),
            &SessionState::Practicing(Phase::Recognition)
        );
        assert_eq!(session.current_word().unwrap().id, 4);
    }
}
