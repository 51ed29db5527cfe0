//! Handlers for each main route.

pub mod auth;
pub mod content;
pub mod difficult_words;
pub mod final_round;
pub mod progress;
pub mod quotes;

mod prelude;
