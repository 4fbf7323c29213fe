//! State enumeration.
//!
//! Both modes walk the lexicographic successor order of a sorted multiset,
//! which visits every distinct arrangement exactly once. No dedup set is
//! needed and the output order is reproducible across runs.

use tracing::debug;

use crate::input::InputSelector;
use crate::state::{State, Value};

/// Iterator over the distinct permutations of a multiset, in lexicographic order.
#[derive(Debug, Clone)]
pub struct DistinctPermutations {
    current: Option<Vec<Value>>,
}

impl DistinctPermutations {
    /// Start from the smallest arrangement of `values`.
    pub fn new(values: &[Value]) -> Self {
        let mut start = values.to_vec();
        start.sort_unstable();
        Self {
            current: Some(start),
        }
    }
}

impl Iterator for DistinctPermutations {
    type Item = State;

    fn next(&mut self) -> Option<State> {
        let current = self.current.take()?;
        let mut successor = current.clone();
        if next_permutation(&mut successor) {
            self.current = Some(successor);
        }
        Some(State::new(current))
    }
}

/// Rearrange `values` into its lexicographic successor.
///
/// Returns `false` (leaving `values` untouched) when it is already the last arrangement.
fn next_permutation(values: &mut [Value]) -> bool {
    if values.len() < 2 {
        return false;
    }
    let Some(pivot) = (0..values.len() - 1).rev().find(|&i| values[i] < values[i + 1]) else {
        return false;
    };
    // Rightmost element strictly greater than the pivot; one exists because
    // values[pivot + 1] qualifies.
    let Some(swap) = (pivot + 1..values.len()).rev().find(|&j| values[j] > values[pivot]) else {
        return false;
    };
    values.swap(pivot, swap);
    values[pivot + 1..].reverse();
    true
}

/// All permutations of `1..=n` in lexicographic order (`n!` states).
pub fn states_from_size(n: usize) -> Vec<State> {
    let values: Vec<Value> = (1..=n as Value).collect();
    DistinctPermutations::new(&values).collect()
}

/// All distinct permutations of `values` in lexicographic order.
pub fn states_from_values(values: &[Value]) -> Vec<State> {
    DistinctPermutations::new(values).collect()
}

/// Enumerate the node set for a selector.
pub fn enumerate_states(input: &InputSelector) -> Vec<State> {
    let states = match input {
        InputSelector::Size(n) => states_from_size(*n),
        InputSelector::Values(values) => states_from_values(values),
    };
    debug!(states = states.len(), "Enumerated states");
    states
}
