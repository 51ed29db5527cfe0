use octovoc_core::{Phase, WordId};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// An answer given during a battery phase.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerQuestion<'a> {
    /// Absent for guests, who have no progress on the server.
    pub battery_progress_id: Option<i32>,
    pub word_id: WordId,
    pub answer: Cow<'a, str>,
    pub phase: Phase,
}

/// An answer given during a module's final round.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FinalRoundAnswer<'a> {
    pub word_id: WordId,
    pub answer: Cow<'a, str>,
}

/// Narrows the module list down to one school level.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModuleFilter {
    pub level: Option<i32>,
}
