//! Octovoc core types and functions.
//!
//! Everything here is pure: the typing matcher, answer checking and example sentence
//! rendering are shared by the practice engine, its browser client and the server.

pub mod answer;
pub mod reward;
pub mod sentence;
pub mod types;
pub mod typing;

pub use types::{BatteryId, DifficultWord, ModuleId, Phase, Word, WordId};
pub use typing::{should_submit, Decision};
