//! The question queue used within a phase, the final round and difficult words practice.

use octovoc_core::WordId;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

/// Word ids waiting to be asked, head first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionQueue(VecDeque<WordId>);

impl QuestionQueue {
    /// A queue of the given ids in random order.
    pub fn shuffled(ids: impl IntoIterator<Item = WordId>) -> Self {
        Self::shuffled_with(ids, &mut rand::rng())
    }

    pub fn shuffled_with<R: rand::Rng + ?Sized>(
        ids: impl IntoIterator<Item = WordId>,
        rng: &mut R,
    ) -> Self {
        let mut ids = ids.into_iter().collect::<Vec<_>>();
        ids.shuffle(rng);
        Self(ids.into())
    }

    /// A queue that keeps the given order, e.g. when resuming a stored queue.
    pub fn ordered(ids: impl IntoIterator<Item = WordId>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn head(&self) -> Option<WordId> {
        self.0.front().copied()
    }

    /// Removes the head after it was dealt with.
    pub fn pop(&mut self) -> Option<WordId> {
        let popped = self.0.pop_front();
        tracing::trace!("popped {popped:?}, {} left", self.0.len());
        popped
    }

    /// Moves the head to the back of the queue so that it's asked again after every other word.
    pub fn requeue(&mut self) -> Option<WordId> {
        let head = self.0.pop_front()?;
        self.0.push_back(head);
        tracing::trace!("requeued {head}");
        Some(head)
    }

    /// Removes the word wherever it is in the queue.
    pub fn remove(&mut self, id: WordId) -> bool {
        let before = self.0.len();
        self.0.retain(|queued| *queued != id);
        before != self.0.len()
    }

    pub fn contains(&self, id: WordId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = WordId> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<WordId> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<WordId> for QuestionQueue {
    fn from_iter<T: IntoIterator<Item = WordId>>(iter: T) -> Self {
        Self::ordered(iter)
    }
}
