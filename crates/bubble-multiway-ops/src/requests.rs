//! Request DTOs for operations.
//!
//! A request carries everything a build needs, so the CLI and library callers
//! drive the same code path.

use bubble_multiway_core::{CoreResult, InputSelector};
use serde::{Deserialize, Serialize};

/// Request to build a multiway or causal graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    /// Which states to enumerate.
    pub input: InputSelector,

    /// Add a synthetic node with an edge to every state.
    ///
    /// Ignored by causal builds.
    #[serde(default)]
    pub super_source: bool,
}

impl BuildRequest {
    /// Create a build request for `input`.
    pub fn new(input: InputSelector) -> Self {
        Self {
            input,
            super_source: false,
        }
    }

    /// Create a build request for the permutations of `1..=n`.
    pub fn size(n: usize) -> CoreResult<Self> {
        Ok(Self::new(InputSelector::size(n)?))
    }

    /// Create a build request from a comma-separated value list.
    pub fn values(raw: &str) -> CoreResult<Self> {
        Ok(Self::new(InputSelector::parse_values(raw)?))
    }

    /// Set the super-source flag.
    pub fn with_super_source(mut self, super_source: bool) -> Self {
        self.super_source = super_source;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_multiway_core::InputError;

    #[test]
    fn test_constructors() {
        let request = BuildRequest::size(3).unwrap().with_super_source(true);
        assert_eq!(request.input, InputSelector::Size(3));
        assert!(request.super_source);

        let request = BuildRequest::values("3, 1,2").unwrap();
        assert_eq!(request.input, InputSelector::Values(vec![3, 1, 2]));
        assert!(!request.super_source);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            BuildRequest::values("1,x"),
            Err(InputError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_super_source_defaults_when_missing() {
        let request: BuildRequest = serde_json::from_str(r#"{"input":{"size":2}}"#).unwrap();
        assert_eq!(request, BuildRequest::new(InputSelector::Size(2)));
    }
}
