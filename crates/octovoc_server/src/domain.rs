//! Functions and types dealing with data specific to Octovoc's problem domain.

pub mod content;
pub mod final_round;
pub mod progress;
pub mod quotes;
