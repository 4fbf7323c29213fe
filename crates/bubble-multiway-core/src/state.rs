//! Value sequences used as graph states.
//!
//! A [`State`] is its own identity: two states are the same node iff their
//! sequences are element-wise equal. Equality, hashing and ordering are all
//! structural, so duplicate values collapse construction paths naturally.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer value stored in a state.
pub type Value = i64;

/// An ordered, fixed-length arrangement of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Vec<Value>);

impl State {
    /// Wrap a value sequence.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Borrow the underlying values.
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Number of positions in the state.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the state has no positions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Count of out-of-order pairs.
    pub fn inversions(&self) -> usize {
        inversions(&self.0)
    }

    /// Whether the values are in non-descending order.
    pub fn is_sorted(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }

    /// The sorted arrangement of the same values.
    pub fn sorted(&self) -> State {
        let mut values = self.0.clone();
        values.sort_unstable();
        State(values)
    }

    /// Copy of this state with positions `i` and `i + 1` exchanged.
    ///
    /// # Panics
    /// Panics if `i + 1` is out of bounds.
    pub fn swapped(&self, i: usize) -> State {
        let mut values = self.0.clone();
        values.swap(i, i + 1);
        State(values)
    }

    /// Values concatenated without separators, e.g. `321`.
    pub fn compact_label(&self) -> String {
        self.0.iter().map(|v| v.to_string()).collect()
    }

    /// Consume the state and return its values.
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for State {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<&[Value]> for State {
    fn from(values: &[Value]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[Value; N]> for State {
    fn from(values: [Value; N]) -> Self {
        Self(values.to_vec())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Count index pairs `(i, j)` with `i < j` and `seq[i] > seq[j]`.
pub fn inversions(seq: &[Value]) -> usize {
    let mut count = 0;
    for (i, a) in seq.iter().enumerate() {
        count += seq[i + 1..].iter().filter(|b| a > b).count();
    }
    count
}
