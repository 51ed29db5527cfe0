//! Who is practising, and how the session should feel.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether progress is kept by the server or only in the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Authenticated,
    Anonymous,
}

/// How long answer feedback stays visible before the next word is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackTiming {
    pub standard: Duration,
    /// Used for wrong typed answers so that the student has time to read the correct one.
    pub incorrect_typed: Duration,
}

impl FeedbackTiming {
    pub fn dwell(&self, correct: bool, typed: bool) -> Duration {
        if !correct && typed {
            self.incorrect_typed
        } else {
            self.standard
        }
    }
}

impl Default for FeedbackTiming {
    fn default() -> Self {
        Self {
            standard: Duration::from_millis(800),
            incorrect_typed: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Set for logged in students.
    pub user_id: Option<i32>,
    /// The school level a guest picked on the landing page.
    pub guest_level: Option<u8>,
    pub gdpr_accepted: bool,
    pub timing: FeedbackTiming,
    /// How many options to offer in phases 1 and 2.
    pub max_choices: usize,
}

impl SessionContext {
    pub const DEFAULT_MAX_CHOICES: usize = 5;

    pub fn student(user_id: i32) -> Self {
        Self {
            user_id: Some(user_id),
            guest_level: None,
            gdpr_accepted: true,
            timing: FeedbackTiming::default(),
            max_choices: Self::DEFAULT_MAX_CHOICES,
        }
    }

    pub fn guest(guest_level: Option<u8>, gdpr_accepted: bool) -> Self {
        Self {
            user_id: None,
            guest_level,
            gdpr_accepted,
            timing: FeedbackTiming::default(),
            max_choices: Self::DEFAULT_MAX_CHOICES,
        }
    }

    /// The level to list modules for. Students see every level, guests the one they picked.
    pub fn module_level(&self) -> Option<i32> {
        match self.mode() {
            Mode::Authenticated => None,
            Mode::Anonymous => self.guest_level.map(i32::from),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.user_id.is_some() {
            Mode::Authenticated
        } else {
            Mode::Anonymous
        }
    }
}
