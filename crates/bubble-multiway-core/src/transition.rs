//! Bubble transitions: one adjacent, strictly out-of-order swap.

use crate::state::State;

/// A single applicable swap and the state it produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Left index of the swapped pair `(i, i + 1)`.
    pub swap_index: usize,
    /// State after the swap.
    pub target: State,
}

/// Lazy iterator over the transitions of one state.
///
/// Holds only a borrow and a cursor; calling [`transitions`] again restarts
/// from the first pair.
#[derive(Debug, Clone)]
pub struct Transitions<'a> {
    state: &'a State,
    next: usize,
}

impl Iterator for Transitions<'_> {
    type Item = Transition;

    fn next(&mut self) -> Option<Transition> {
        let values = self.state.values();
        while self.next + 1 < values.len() {
            let i = self.next;
            self.next += 1;
            // Strict: equal neighbours would swap into the same state.
            if values[i] > values[i + 1] {
                return Some(Transition {
                    swap_index: i,
                    target: self.state.swapped(i),
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.state.len().saturating_sub(self.next + 1);
        (0, Some(remaining))
    }
}

/// All transitions out of `state`, ordered by swap index.
pub fn transitions(state: &State) -> Transitions<'_> {
    Transitions { state, next: 0 }
}

/// Successor states of `state`, ordered by swap index.
pub fn successors(state: &State) -> impl Iterator<Item = State> + '_ {
    transitions(state).map(|t| t.target)
}
