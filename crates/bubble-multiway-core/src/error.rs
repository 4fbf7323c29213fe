//! Error types for input validation.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, InputError>;

/// Errors raised while turning raw input into an [`InputSelector`](crate::InputSelector).
///
/// Graph construction itself is total: once a selector exists every build
/// succeeds, so these are the only failures the core reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A token in a comma-separated value list is not an integer.
    #[error("invalid value {token:?} at position {position} (expected an integer, e.g. 3,1,1,2)")]
    InvalidValue { token: String, position: usize },

    /// The value list was empty or the size was zero.
    #[error("input is empty: provide n >= 1 or at least one value")]
    Empty,

    /// Neither a size nor a value list was provided.
    #[error("missing input: provide exactly one of -n <size> or --values <list>")]
    Missing,

    /// Both a size and a value list were provided.
    #[error("conflicting input: -n and --values are mutually exclusive")]
    Conflicting,
}
