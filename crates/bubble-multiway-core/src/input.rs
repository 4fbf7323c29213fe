//! Input selection: a permutation size or an explicit multiset of values.

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, InputError};
use crate::state::{inversions, State, Value};

/// The single input that drives a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSelector {
    /// All permutations of `1..=n`.
    Size(usize),
    /// All distinct permutations of the given values (duplicates allowed).
    Values(Vec<Value>),
}

impl InputSelector {
    /// Select permutations of `1..=n`.
    pub fn size(n: usize) -> CoreResult<Self> {
        if n == 0 {
            return Err(InputError::Empty);
        }
        Ok(Self::Size(n))
    }

    /// Select distinct permutations of `values`.
    pub fn values(values: Vec<Value>) -> CoreResult<Self> {
        if values.is_empty() {
            return Err(InputError::Empty);
        }
        Ok(Self::Values(values))
    }

    /// Parse a comma-separated value list such as `3,1,1,2`.
    pub fn parse_values(raw: &str) -> CoreResult<Self> {
        Self::values(parse_values(raw)?)
    }

    /// Build a selector from the two optional CLI-style inputs.
    ///
    /// Exactly one of them must be present.
    pub fn from_parts(size: Option<usize>, values: Option<&str>) -> CoreResult<Self> {
        match (size, values) {
            (Some(_), Some(_)) => Err(InputError::Conflicting),
            (None, None) => Err(InputError::Missing),
            (Some(n), None) => Self::size(n),
            (None, Some(raw)) => Self::parse_values(raw),
        }
    }

    /// The input values in their given order (`1..=n` for size mode).
    pub fn input_values(&self) -> Vec<Value> {
        match self {
            Self::Size(n) => (1..=*n as Value).collect(),
            Self::Values(values) => values.clone(),
        }
    }

    /// Length shared by every state of the build.
    pub fn state_len(&self) -> usize {
        match self {
            Self::Size(n) => *n,
            Self::Values(values) => values.len(),
        }
    }

    /// The fully sorted arrangement, which every state eventually reaches.
    pub fn sorted_state(&self) -> State {
        State::new(self.input_values()).sorted()
    }

    /// Inversion count of the descending arrangement.
    ///
    /// This is the length of the longest transition path: `n(n-1)/2` for a
    /// size, fewer when a value list repeats values.
    pub fn max_inversions(&self) -> usize {
        match self {
            Self::Size(n) => n * n.saturating_sub(1) / 2,
            Self::Values(values) => {
                let mut descending = values.clone();
                descending.sort_unstable_by(|a, b| b.cmp(a));
                inversions(&descending)
            }
        }
    }

    /// Inversion count of the input in the order it was given.
    ///
    /// Always at most [`max_inversions`](Self::max_inversions); size mode
    /// starts sorted, so this is zero there.
    pub fn input_inversions(&self) -> usize {
        match self {
            Self::Size(_) => 0,
            Self::Values(values) => inversions(values),
        }
    }

    /// Number of states enumeration will produce.
    ///
    /// Saturates at `u128::MAX` rather than overflowing.
    pub fn estimated_state_count(&self) -> u128 {
        match self {
            Self::Size(n) => factorial(*n),
            Self::Values(values) => distinct_permutation_count(values),
        }
    }
}

/// Split a comma-separated list into integers.
///
/// Whitespace around tokens is trimmed and empty tokens are skipped, so
/// `"3, 1,,2,"` parses as `[3, 1, 2]`.
pub fn parse_values(raw: &str) -> CoreResult<Vec<Value>> {
    raw.split(',')
        .map(str::trim)
        .enumerate()
        .filter(|(_, token)| !token.is_empty())
        .map(|(position, token)| {
            token.parse::<Value>().map_err(|_| InputError::InvalidValue {
                token: token.to_string(),
                position,
            })
        })
        .collect()
}

/// Multiset permutation count: `len! / (m1! * m2! * ...)`.
pub fn distinct_permutation_count(values: &[Value]) -> u128 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    // Build the multinomial incrementally to stay within range for longer.
    let mut count: u128 = 1;
    let mut placed: u128 = 0;
    let mut run: u128 = 0;
    for (i, v) in sorted.iter().enumerate() {
        run = if i > 0 && sorted[i - 1] == *v { run + 1 } else { 1 };
        placed += 1;
        count = match count.checked_mul(placed) {
            Some(c) => c / run,
            None => return u128::MAX,
        };
    }
    count
}

fn factorial(n: usize) -> u128 {
    (1..=n as u128).try_fold(1u128, |acc, k| acc.checked_mul(k)).unwrap_or(u128::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values_trims_and_skips_empty_tokens() {
        assert_eq!(parse_values("3, 1,,2,").unwrap(), vec![3, 1, 2]);
        assert_eq!(parse_values("-1,0").unwrap(), vec![-1, 0]);
    }

    #[test]
    fn test_parse_values_rejects_non_numeric_token() {
        let err = parse_values("3,x,1").unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidValue {
                token: "x".to_string(),
                position: 1
            }
        );
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        assert_eq!(InputSelector::parse_values(" , "), Err(InputError::Empty));
        assert_eq!(InputSelector::size(0), Err(InputError::Empty));
    }

    #[test]
    fn test_from_parts_requires_exactly_one_selector() {
        assert_eq!(
            InputSelector::from_parts(Some(3), Some("1,2")),
            Err(InputError::Conflicting)
        );
        assert_eq!(InputSelector::from_parts(None, None), Err(InputError::Missing));
        assert_eq!(
            InputSelector::from_parts(Some(3), None),
            Ok(InputSelector::Size(3))
        );
        assert_eq!(
            InputSelector::from_parts(None, Some("2,1")),
            Ok(InputSelector::Values(vec![2, 1]))
        );
    }

    #[test]
    fn test_sorted_state_and_max_inversions() {
        let size = InputSelector::Size(4);
        assert_eq!(size.sorted_state(), State::from([1, 2, 3, 4]));
        assert_eq!(size.max_inversions(), 6);

        let values = InputSelector::Values(vec![3, 1, 1, 2]);
        assert_eq!(values.sorted_state(), State::from([1, 1, 2, 3]));
        assert_eq!(values.max_inversions(), 5);
        assert_eq!(values.input_inversions(), 3);
    }

    #[test]
    fn test_estimated_state_count() {
        assert_eq!(InputSelector::Size(5).estimated_state_count(), 120);
        assert_eq!(distinct_permutation_count(&[1, 1]), 1);
        assert_eq!(distinct_permutation_count(&[3, 1, 1, 2]), 12);
        assert_eq!(distinct_permutation_count(&[1, 1, 2, 2]), 6);
        assert_eq!(distinct_permutation_count(&[7; 30]), 1);
    }

    #[test]
    fn test_estimated_state_count_saturates() {
        assert_eq!(InputSelector::Size(60).estimated_state_count(), u128::MAX);
    }
}
