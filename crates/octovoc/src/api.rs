//! The remote services the engine talks to.
//!
//! The browser client implements these over HTTP, tests implement them with scripted fakes.

#![allow(async_fn_in_trait)]

use octovoc_api::response as res;
use octovoc_core::{BatteryId, ModuleId, Phase, WordId};
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// A failed API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    /// The HTTP status, if a response was received at all.
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

/// Server-side progress of a logged in student.
pub trait ProgressApi {
    async fn start_module(&self, module_id: ModuleId) -> ApiResult<res::ModuleProgress>;

    async fn start_battery(&self, battery_id: BatteryId) -> ApiResult<res::BatteryStart>;

    async fn answer_question(
        &self,
        battery_progress_id: i32,
        word_id: WordId,
        answer: &str,
        phase: Phase,
    ) -> ApiResult<res::AnswerResult>;

    async fn start_final_round(&self, module_id: ModuleId) -> ApiResult<res::FinalRoundStart>;

    async fn answer_final_round(
        &self,
        module_id: ModuleId,
        word_id: WordId,
        answer: &str,
    ) -> ApiResult<res::FinalRoundResult>;

    async fn complete_module(&self, module_id: ModuleId) -> ApiResult<res::ModuleCompletion>;

    async fn difficult_words(&self) -> ApiResult<Vec<res::DifficultWord>>;

    async fn remove_difficult_word(&self, word_id: WordId) -> ApiResult<()>;
}

/// Module and battery content, available without an account for free modules.
pub trait ContentApi {
    /// The active modules, only those of `level` if given.
    async fn modules(&self, level: Option<i32>) -> ApiResult<Vec<res::ModuleSummary>>;

    async fn module_outline(&self, module_id: ModuleId) -> ApiResult<res::ModuleOutline>;

    async fn battery(&self, battery_id: BatteryId) -> ApiResult<res::BatteryContent>;
}

pub trait RewardApi {
    async fn random_quote(&self) -> ApiResult<Option<res::Quote>>;
}
