//! Answer feedback and the gate that keeps a session to one answer at a time.

use std::time::Duration;

/// The verdict shown to the student after answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub given_answer: String,
    pub correct_answer: String,
    /// How long the feedback stays up before the session moves on.
    pub dwell: Duration,
}

/// Identifies the feedback a pending transition belongs to.
///
/// Settling with a ticket that no longer matches does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellTicket {
    generation: u64,
}

/// The result of handing an answer or keystroke to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The session is showing feedback or not practising.
    Ignored,
    /// The typed input was not submitted yet.
    Waiting,
    Answered {
        feedback: Feedback,
        ticket: DwellTicket,
    },
    /// The server answered with something the session cannot continue from.
    Redirected,
}

/// What settling a ticket did to a final round or difficult words practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    Stale,
    NextWord,
    Complete,
    Redirected,
}

#[derive(Debug)]
enum GateState<P> {
    Open,
    Showing { feedback: Feedback, pending: P },
    Closed,
}

/// Holds the result of an answer until its feedback has been shown.
///
/// Answers are only accepted while the gate is open.
#[derive(Debug)]
pub(crate) struct AnswerGate<P> {
    generation: u64,
    state: GateState<P>,
}

impl<P> Default for AnswerGate<P> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: GateState::Open,
        }
    }
}

impl<P> AnswerGate<P> {
    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::Open)
    }

    pub fn show(&mut self, feedback: Feedback, pending: P) -> DwellTicket {
        self.state = GateState::Showing { feedback, pending };
        DwellTicket {
            generation: self.generation,
        }
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        match &self.state {
            GateState::Showing { feedback, .. } => Some(feedback),
            _ => None,
        }
    }

    /// The feedback belonging to `ticket`, if it is still showing.
    pub fn feedback_for(&self, ticket: DwellTicket) -> Option<&Feedback> {
        if ticket.generation == self.generation {
            self.feedback()
        } else {
            None
        }
    }

    /// Clears the feedback and hands back the pending result if `ticket` is current.
    pub fn take(&mut self, ticket: DwellTicket) -> Option<P> {
        if ticket.generation != self.generation || self.feedback().is_none() {
            return None;
        }
        match std::mem::replace(&mut self.state, GateState::Open) {
            GateState::Showing { pending, .. } => {
                self.generation += 1;
                Some(pending)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Shuts the gate for good, invalidating every outstanding ticket.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = GateState::Closed;
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, GateState::Closed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn feedback() -> Feedback {
        Feedback {
            correct: true,
            given_answer: "kat".to_string(),
            correct_answer: "kat".to_string(),
            dwell: Duration::from_millis(800),
        }
    }

    #[test]
    fn closed_while_showing_feedback() {
        let mut gate = AnswerGate::<u8>::default();
        assert!(gate.is_open());
        let ticket = gate.show(feedback(), 1);
        assert!(!gate.is_open());
        assert_eq!(gate.take(ticket), Some(1));
        assert!(gate.is_open());
    }

    #[test]
    fn tickets_are_used_once() {
        let mut gate = AnswerGate::<u8>::default();
        let ticket = gate.show(feedback(), 1);
        assert_eq!(gate.take(ticket), Some(1));
        gate.show(feedback(), 2);
        assert_eq!(gate.take(ticket), None);
        assert!(gate.feedback().is_some());
    }

    #[test]
    fn closing_invalidates_tickets() {
        let mut gate = AnswerGate::<u8>::default();
        let ticket = gate.show(feedback(), 1);
        gate.close();
        assert_eq!(gate.take(ticket), None);
        assert_eq!(gate.feedback_for(ticket), None);
        assert!(gate.is_closed());
        assert!(!gate.is_open());
    }
}
