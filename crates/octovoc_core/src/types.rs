//! Reference data shared by every part of Octovoc.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type WordId = i32;
pub type BatteryId = i32;
pub type ModuleId = i32;

/// A word to learn, as authored in a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    /// The dictionary form the student has to produce.
    pub word: String,
    pub meaning: String,
    /// Contains the target term wrapped in single asterisks, e.g. `Hij was *ambivalent* over de keuze.`
    pub example_sentence: String,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Where the word was authored. Not used when practising.
    #[serde(default)]
    pub module_id: Option<ModuleId>,
    #[serde(default)]
    pub position_in_module: Option<i32>,
}

/// One of the three recall phases a battery goes through.
///
/// Serialised as the phase number (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Phase {
    /// Pick the meaning of the underlined word.
    Recognition,
    /// Pick the word form that fits the blank.
    CuedRecall,
    /// Type the word that fits the blank.
    FreeProduction,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Recognition, Phase::CuedRecall, Phase::FreeProduction];

    pub fn number(self) -> u8 {
        match self {
            Self::Recognition => 1,
            Self::CuedRecall => 2,
            Self::FreeProduction => 3,
        }
    }

    /// The phase that follows this one within a battery, if any.
    pub fn next(self) -> Option<Phase> {
        match self {
            Self::Recognition => Some(Self::CuedRecall),
            Self::CuedRecall => Some(Self::FreeProduction),
            Self::FreeProduction => None,
        }
    }

    /// Whether a missed word goes back into the queue.
    ///
    /// The two multiple-choice phases show every word once; only free production
    /// insists on a correct answer for every word.
    pub fn requeues_misses(self) -> bool {
        matches!(self, Self::FreeProduction)
    }

    /// Whether the student answers by typing rather than picking a choice.
    pub fn is_typed(self) -> bool {
        matches!(self, Self::FreeProduction)
    }
}

impl TryFrom<u8> for Phase {
    type Error = InvalidPhase;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Recognition),
            2 => Ok(Self::CuedRecall),
            3 => Ok(Self::FreeProduction),
            other => Err(InvalidPhase(other.into())),
        }
    }
}

impl TryFrom<i32> for Phase {
    type Error = InvalidPhase;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| InvalidPhase(value))
            .and_then(Phase::try_from)
    }
}

impl From<Phase> for u8 {
    fn from(value: Phase) -> Self {
        value.number()
    }
}

impl From<Phase> for i32 {
    fn from(value: Phase) -> Self {
        value.number().into()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPhase(pub i32);

impl fmt::Display for InvalidPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid phase {}, expected 1, 2 or 3", self.0)
    }
}

impl std::error::Error for InvalidPhase {}

/// A word the student keeps getting wrong, waiting in their difficult words pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultWord {
    pub id: i32,
    pub word_id: WordId,
    pub word: Word,
}
