pub use chrono::{DateTime, Utc};
pub use octovoc_core::{BatteryId, DifficultWord, ModuleId, Phase, Word, WordId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub message: String,
}

/// A module in the list a student picks from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub id: ModuleId,
    pub name: String,
    pub level: i32,
    pub is_free: bool,
    /// Only for logged in students who started the module.
    pub progress: Option<ModuleProgress>,
    /// Share of completed batteries, from 0 to 100.
    pub completion_percentage: Option<f64>,
}

/// The shuffled battery order of a module, as needed to practise it without an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleOutline {
    pub id: ModuleId,
    pub name: String,
    pub is_free: bool,
    pub battery_order: Vec<BatteryId>,
}

/// The words of a battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryContent {
    pub id: BatteryId,
    pub module_id: ModuleId,
    pub words: Vec<Word>,
}

/// A student's progress through a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleProgress {
    pub id: i32,
    pub module_id: ModuleId,
    /// `None` once every battery has been completed.
    pub current_battery_id: Option<BatteryId>,
    pub battery_order: Vec<BatteryId>,
    pub completed_batteries: Vec<BatteryId>,
    pub in_final_round: bool,
    pub final_round_word_ids: Vec<WordId>,
    pub is_completed: bool,
    pub completion_date: Option<DateTime<Utc>>,
    pub started_at: DateTime<Utc>,
}

/// A student's progress through a battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryProgress {
    pub id: i32,
    pub battery_id: BatteryId,
    pub current_phase: Phase,
    /// Words that still have to be answered in the current phase, head first.
    pub current_question_queue: Vec<WordId>,
    pub phase1_completed: bool,
    pub phase2_completed: bool,
    pub phase3_completed: bool,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatteryStart {
    pub battery_progress: BatteryProgress,
    /// `None` when the battery has nothing left to ask, e.g. because it has no words.
    pub current_word: Option<Word>,
    pub battery_words: Vec<Word>,
}

/// The server's verdict on an answer and what to show next.
///
/// Exactly one of `battery_complete`, `phase_complete` (with `next_word`) or `next_word` is
/// expected to describe the next step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub is_correct: bool,
    pub correct_answer: String,
    pub battery_progress: Option<BatteryProgress>,
    pub next_word: Option<Word>,
    #[serde(default)]
    pub phase_complete: bool,
    #[serde(default)]
    pub battery_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRoundStart {
    /// Set when there was nothing to practise and the module was completed right away.
    pub completed: bool,
    pub current_word: Option<Word>,
    pub total_words: usize,
    pub remaining: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRoundResult {
    pub is_correct: bool,
    pub correct_answer: String,
    pub next_word: Option<Word>,
    pub remaining: usize,
    pub final_round_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleCompletion {
    pub quote: Option<Quote>,
    pub progress: ModuleProgress,
}

/// A congratulatory quote or video shown after completing a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i32,
    pub text: String,
    pub author: Option<String>,
    pub video_url: Option<String>,
}

impl Quote {
    /// The YouTube video id of the quote's video, if it links to one.
    pub fn youtube_video_id(&self) -> Option<&str> {
        self.video_url
            .as_deref()
            .and_then(octovoc_core::reward::youtube_video_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomQuote {
    pub quote: Option<Quote>,
}
