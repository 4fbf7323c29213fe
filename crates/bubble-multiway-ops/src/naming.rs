//! Default artifact names derived from the input descriptor.

use std::fmt;

use bubble_multiway_core::InputSelector;
use serde::{Deserialize, Serialize};

/// Which graph an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    /// State graph of bubble transitions.
    Multiway,
    /// Event graph of chained swaps.
    Causal,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Multiway => write!(f, "multiway"),
            GraphKind::Causal => write!(f, "causal"),
        }
    }
}

/// Stem shared by every artifact of one build, e.g. `bubble_multiway_n3`.
///
/// Value lists are spelled out with `_` separators and negative values get an
/// `m` prefix, so `3,-1,2` becomes `vals_3_m1_2`.
pub fn artifact_stem(kind: GraphKind, input: &InputSelector) -> String {
    let descriptor = match input {
        InputSelector::Size(n) => format!("n{}", n),
        InputSelector::Values(values) => {
            let parts: Vec<String> = values
                .iter()
                .map(|v| {
                    if *v < 0 {
                        format!("m{}", v.unsigned_abs())
                    } else {
                        v.to_string()
                    }
                })
                .collect();
            format!("vals_{}", parts.join("_"))
        }
    };
    format!("bubble_{}_{}", kind, descriptor)
}

/// Default file name for an artifact with the given extension.
pub fn default_artifact_name(kind: GraphKind, input: &InputSelector, extension: &str) -> String {
    format!(
        "{}.{}",
        artifact_stem(kind, input),
        extension.trim_start_matches('.')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_names() {
        assert_eq!(
            default_artifact_name(GraphKind::Multiway, &InputSelector::Size(3), "graphml"),
            "bubble_multiway_n3.graphml"
        );
        assert_eq!(
            default_artifact_name(GraphKind::Causal, &InputSelector::Size(4), ".json"),
            "bubble_causal_n4.json"
        );
    }

    #[test]
    fn test_value_names() {
        let input = InputSelector::Values(vec![3, -1, 1, 2]);
        assert_eq!(
            artifact_stem(GraphKind::Multiway, &input),
            "bubble_multiway_vals_3_m1_1_2"
        );
    }

    #[test]
    fn test_names_are_deterministic() {
        let input = InputSelector::Values(vec![2, 2, 1]);
        assert_eq!(
            default_artifact_name(GraphKind::Causal, &input, "svg"),
            default_artifact_name(GraphKind::Causal, &input, "svg")
        );
    }
}
