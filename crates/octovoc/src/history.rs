/// The state of one slot in the progress indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Empty,
    Correct,
    Incorrect,
}

/// One slot per battery word, filled in answer order and cleared when a phase starts.
///
/// Answers beyond the number of slots, e.g. repeated misses in phase 3, are not shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressHistory {
    slots: Vec<Slot>,
    filled: usize,
}

impl ProgressHistory {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![Slot::Empty; len],
            filled: 0,
        }
    }

    pub fn reset(&mut self, len: usize) {
        *self = Self::new(len);
    }

    pub fn record(&mut self, correct: bool) {
        if let Some(slot) = self.slots.get_mut(self.filled) {
            *slot = if correct {
                Slot::Correct
            } else {
                Slot::Incorrect
            };
            self.filled += 1;
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn correct(&self) -> usize {
        self.slots.iter().filter(|s| **s == Slot::Correct).count()
    }
}
