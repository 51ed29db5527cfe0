use super::{AnswerOutcome, BatteryState, ModulePlan, NextStep, ProgressBackend};
use crate::{
    api::ProgressApi,
    context::Mode,
    error::{SessionError, SessionResult},
};
use octovoc_api::response::{self as res, Quote};
use octovoc_core::{BatteryId, ModuleId, WordId};

/// Practises against the server, which grades answers and keeps the progress.
#[derive(Debug)]
pub struct ServerBackend<A> {
    api: A,
    state: Option<BatteryState>,
}

impl<A> ServerBackend<A> {
    pub fn new(api: A) -> Self {
        Self { api, state: None }
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

impl<A: ProgressApi> ProgressBackend for ServerBackend<A> {
    fn mode(&self) -> Mode {
        Mode::Authenticated
    }

    async fn start_module(&mut self, module_id: ModuleId) -> SessionResult<ModulePlan> {
        tracing::info!("starting module {module_id}");
        let progress = self.api.start_module(module_id).await?;
        Ok(module_plan(&progress))
    }

    async fn start_battery(&mut self, battery_id: BatteryId) -> SessionResult<BatteryState> {
        tracing::info!("starting battery {battery_id}");
        let start = self.api.start_battery(battery_id).await?;
        let state = BatteryState {
            battery_id: start.battery_progress.battery_id,
            battery_progress_id: Some(start.battery_progress.id),
            phase: start.battery_progress.current_phase,
            queue: start.battery_progress.current_question_queue,
            current_word: start.current_word,
            words: start.battery_words,
        };
        self.state = Some(state.clone());
        Ok(state)
    }

    async fn submit_answer(
        &mut self,
        word_id: WordId,
        answer: &str,
    ) -> SessionResult<AnswerOutcome> {
        let state = self.state.as_ref().ok_or(SessionError::NoBattery)?;
        let battery_progress_id = state.battery_progress_id.ok_or(SessionError::NoBattery)?;

        tracing::info!("submitting answer for word {word_id}");
        let result = self
            .api
            .answer_question(battery_progress_id, word_id, answer, state.phase)
            .await?;
        let next = next_step(&result)?;

        let state = self.state.as_mut().ok_or(SessionError::NoBattery)?;
        if let Some(progress) = result.battery_progress {
            state.phase = progress.current_phase;
            state.queue = progress.current_question_queue;
        }
        state.current_word = result.next_word;

        Ok(AnswerOutcome {
            correct: result.is_correct,
            correct_answer: result.correct_answer,
            next,
        })
    }

    fn current_state(&self) -> Option<&BatteryState> {
        self.state.as_ref()
    }

    async fn reward(&mut self, module_id: ModuleId) -> SessionResult<Option<Quote>> {
        tracing::info!("completing module {module_id}");
        let completion = self.api.complete_module(module_id).await?;
        Ok(completion.quote)
    }
}

fn module_plan(progress: &res::ModuleProgress) -> ModulePlan {
    match progress.current_battery_id {
        Some(battery_id) if !progress.is_completed => ModulePlan::Battery(battery_id),
        _ if progress.in_final_round && !progress.is_completed => ModulePlan::FinalRound,
        _ => ModulePlan::Completed,
    }
}

fn next_step(result: &res::AnswerResult) -> SessionResult<NextStep> {
    if result.battery_complete {
        return Ok(NextStep::BatteryComplete);
    }
    match (&result.next_word, result.phase_complete, &result.battery_progress) {
        (Some(_), true, Some(progress)) => Ok(NextStep::PhaseComplete(progress.current_phase)),
        (Some(_), false, _) => Ok(NextStep::Word),
        _ => Err(SessionError::UnexpectedResponse(format!(
            "no next step in answer result (phase complete: {}, next word: {})",
            result.phase_complete,
            result.next_word.is_some()
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{api::ApiError, testing::*};
    use octovoc_core::Phase;

    #[test]
    fn plans_from_module_progress() {
        assert_eq!(
            module_plan(&module_progress(1, Some(3), false)),
            ModulePlan::Battery(3)
        );
        assert_eq!(
            module_plan(&module_progress(1, None, true)),
            ModulePlan::FinalRound
        );
        let mut completed = module_progress(1, None, true);
        completed.is_completed = true;
        assert_eq!(module_plan(&completed), ModulePlan::Completed);
    }

    #[tokio::test]
    async fn follows_server_transitions() {
        init_logging();
        let api = ScriptedProgress::default();
        ScriptedProgress::script(&api.battery_starts, Ok(battery_start(7, Phase::Recognition, vec![1, 2])));
        ScriptedProgress::script(&api.answers, Ok(next_word(true, battery_progress(7, Phase::Recognition, vec![2]))));
        let mut phase_complete = next_word(false, battery_progress(7, Phase::CuedRecall, vec![2, 1]));
        phase_complete.phase_complete = true;
        ScriptedProgress::script(&api.answers, Ok(phase_complete));

        let mut backend = ServerBackend::new(&api);
        assert_eq!(backend.mode(), Mode::Authenticated);
        let state = backend.start_battery(7).await.unwrap();
        assert_eq!(state.battery_progress_id, Some(107));

        let outcome = backend.submit_answer(1, "betekenis 1").await.unwrap();
        assert_eq!(outcome.next, NextStep::Word);
        assert_eq!(
            backend.current_state().unwrap().current_word.as_ref().map(|w| w.id),
            Some(2)
        );

        let outcome = backend.submit_answer(2, "fout").await.unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.next, NextStep::PhaseComplete(Phase::CuedRecall));
        let state = backend.current_state().unwrap();
        assert_eq!(state.phase, Phase::CuedRecall);
        assert_eq!(state.queue, [2, 1]);

        let submitted = api.submitted.borrow();
        assert_eq!(submitted[0], (107, 1, "betekenis 1".to_string(), Phase::Recognition));
        assert_eq!(submitted[1].3, Phase::Recognition);
    }

    #[tokio::test]
    async fn battery_complete_clears_current_word() {
        let api = ScriptedProgress::default();
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

        let mut backend = ServerBackend::new(&api);
        backend.start_battery(7).await.unwrap();
        let outcome = backend.submit_answer(1, "woord1").await.unwrap();
        assert_eq!(outcome.next, NextStep::BatteryComplete);
        assert_eq!(backend.current_state().unwrap().current_word, None);
    }

    #[tokio::test]
    async fn unexpected_result_leaves_state_alone() {
        let api = ScriptedProgress::default();
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

        let mut backend = ServerBackend::new(&api);
        let before = backend.start_battery(7).await.unwrap();
        assert!(matches!(
            backend.submit_answer(1, "betekenis 1").await,
            Err(SessionError::UnexpectedResponse(_))
        ));
        assert_eq!(backend.current_state(), Some(&before));
    }

    #[tokio::test]
    async fn network_errors_are_returned() {
        let api = ScriptedProgress::default();
        ScriptedProgress::script(&api.battery_starts, Ok(battery_start(7, Phase::Recognition, vec![1])));
        ScriptedProgress::script(&api.answers, Err(ApiError::new("Failed to fetch")));

        let mut backend = ServerBackend::new(&api);
        let before = backend.start_battery(7).await.unwrap();
        assert!(matches!(
            backend.submit_answer(1, "betekenis 1").await,
            Err(SessionError::Api(_))
        ));
        assert_eq!(backend.current_state(), Some(&before));
    }

    #[tokio::test]
    async fn answering_requires_a_battery() {
        let api = ScriptedProgress::default();
        let mut backend = ServerBackend::new(&api);
        assert!(matches!(
            backend.submit_answer(1, "x").await,
            Err(SessionError::NoBattery)
        ));
    }
}
