use super::{AnswerOutcome, BatteryState, ModulePlan, NextStep, ProgressBackend};
use crate::{
    api::{ContentApi, RewardApi},
    battery::{BatteryRun, Transition},
    context::Mode,
    error::{SessionError, SessionResult},
};
use octovoc_api::response::{ModuleOutline, Quote};
use octovoc_core::{answer, BatteryId, ModuleId, Word, WordId};

/// Runs batteries in memory for guests.
///
/// Only the content is fetched, answers are graded locally and forgotten with the backend.
#[derive(Debug)]
pub struct LocalBackend<C> {
    content: C,
    outline: Option<ModuleOutline>,
    completed: Vec<BatteryId>,
    words: Vec<Word>,
    run: Option<BatteryRun>,
    state: Option<BatteryState>,
}

impl<C> LocalBackend<C> {
    pub fn new(content: C) -> Self {
        Self {
            content,
            outline: None,
            completed: Vec::new(),
            words: Vec::new(),
            run: None,
            state: None,
        }
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn completed_batteries(&self) -> &[BatteryId] {
        &self.completed
    }

    fn refresh_state(&mut self) {
        self.state = self.run.as_ref().map(|run| BatteryState {
            battery_id: run.battery_id(),
            battery_progress_id: None,
            phase: run.phase(),
            queue: run.queue().to_vec(),
            current_word: run
                .current()
                .and_then(|id| self.words.iter().find(|w| w.id == id))
                .cloned(),
            words: self.words.clone(),
        });
    }
}

impl<C: ContentApi + RewardApi> ProgressBackend for LocalBackend<C> {
    fn mode(&self) -> Mode {
        Mode::Anonymous
    }

    async fn start_module(&mut self, module_id: ModuleId) -> SessionResult<ModulePlan> {
        let outline = match self.outline.take() {
            Some(outline) if outline.id == module_id => outline,
            _ => {
                tracing::info!("fetching outline of module {module_id}");
                self.completed.clear();
                self.content.module_outline(module_id).await?
            }
        };
        let next = outline
            .battery_order
            .iter()
            .copied()
            .find(|id| !self.completed.contains(id));
        self.outline = Some(outline);

        Ok(match next {
            Some(battery_id) => ModulePlan::Battery(battery_id),
            None => ModulePlan::Completed,
        })
    }

    async fn start_battery(&mut self, battery_id: BatteryId) -> SessionResult<BatteryState> {
        tracing::info!("fetching battery {battery_id}");
        let content = self.content.battery(battery_id).await?;
        let run = BatteryRun::start(battery_id, content.words.iter().map(|w| w.id).collect());
        if run.is_complete() {
            tracing::warn!("battery {battery_id} has no words");
            self.completed.push(battery_id);
        }

        self.words = content.words;
        self.run = Some(run);
        self.refresh_state();
        self.state.clone().ok_or(SessionError::NoBattery)
    }

    async fn submit_answer(
        &mut self,
        word_id: WordId,
        given: &str,
    ) -> SessionResult<AnswerOutcome> {
        let run = self.run.as_mut().ok_or(SessionError::NoBattery)?;
        let word = self
            .words
            .iter()
            .find(|w| w.id == word_id)
            .ok_or(SessionError::UnknownWord {
                word_id,
                battery_id: run.battery_id(),
            })?;

        let phase = run.phase();
        let correct = answer::is_correct(word, phase, given);
        let correct_answer = answer::expected_answer(word, phase).to_string();
        let next = match run.record(word_id, correct)? {
            Transition::Next(_) => NextStep::Word,
            Transition::PhaseComplete { phase, .. } => NextStep::PhaseComplete(phase),
            Transition::BatteryComplete => {
                self.completed.push(run.battery_id());
                NextStep::BatteryComplete
            }
        };
        tracing::debug!("word {word_id} answered, correct: {correct}, next: {next:?}");

        self.refresh_state();
        Ok(AnswerOutcome {
            correct,
            correct_answer,
            next,
        })
    }

    fn current_state(&self) -> Option<&BatteryState> {
        self.state.as_ref()
    }

    async fn reward(&mut self, _module_id: ModuleId) -> SessionResult<Option<Quote>> {
        tracing::info!("fetching a random quote");
        Ok(self.content.random_quote().await?)
    }
}
