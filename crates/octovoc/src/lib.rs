//! The Octovoc practice session engine.
//!
//! A [`PracticeSession`] takes a student through the batteries of a module, three phases per
//! battery, with progress kept either on the server ([`ServerBackend`]) or only in memory for
//! guests ([`LocalBackend`]). [`FinalRound`] and [`DifficultWordsPractice`] drill the words a
//! student got wrong. The [`Dashboard`] lists the modules to pick from.
//!
//! The engine does not depend on a runtime. Feedback dwell times are awaited through a sleep
//! function supplied by the caller.

pub mod api;
pub mod backend;
pub mod battery;
pub mod context;
pub mod dashboard;
pub mod difficult;
pub mod error;
pub mod feedback;
pub mod final_round;
pub mod history;
pub mod queue;
pub mod session;
#[cfg(test)]
mod testing;

pub use backend::{LocalBackend, ProgressBackend, ServerBackend};
pub use context::{FeedbackTiming, Mode, SessionContext};
pub use dashboard::Dashboard;
pub use difficult::DifficultWordsPractice;
pub use error::{SessionError, SessionResult};
pub use feedback::{DwellTicket, Feedback, RoundStep, Submission};
pub use final_round::FinalRound;
pub use session::{Completion, PracticeSession, SessionState, Step};
