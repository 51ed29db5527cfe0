//! Where battery progress lives.
//!
//! Logged in students practise against the server, which decides every transition. Guests run the
//! same phase rules locally and nothing is persisted.

#![allow(async_fn_in_trait)]

mod local;
mod server;

pub use local::LocalBackend;
pub use server::ServerBackend;
use crate::{context::Mode, error::SessionResult};
use octovoc_api::response::Quote;
use octovoc_core::{BatteryId, ModuleId, Phase, Word, WordId};

/// What a module needs next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulePlan {
    Battery(BatteryId),
    /// Every battery is done and the final round is waiting.
    FinalRound,
    Completed,
}

/// A snapshot of the battery being practised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatteryState {
    pub battery_id: BatteryId,
    /// Only set for progress stored on the server.
    pub battery_progress_id: Option<i32>,
    pub phase: Phase,
    pub queue: Vec<WordId>,
    /// `None` once the battery is complete.
    pub current_word: Option<Word>,
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Word,
    /// The given phase has started.
    PhaseComplete(Phase),
    BatteryComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub next: NextStep,
}

pub trait ProgressBackend {
    fn mode(&self) -> Mode;

    async fn start_module(&mut self, module_id: ModuleId) -> SessionResult<ModulePlan>;

    async fn start_battery(&mut self, battery_id: BatteryId) -> SessionResult<BatteryState>;

    /// Grades the answer to the current word and moves the battery along.
    ///
    /// The backend's state only changes once the answer has been graded.
    async fn submit_answer(&mut self, word_id: WordId, answer: &str)
        -> SessionResult<AnswerOutcome>;

    fn current_state(&self) -> Option<&BatteryState>;

    /// Finishes a module that has no final round and picks its reward.
    async fn reward(&mut self, module_id: ModuleId) -> SessionResult<Option<Quote>>;
}
