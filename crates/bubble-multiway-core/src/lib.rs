//! Core domain for the bubble-sort multiway system.
//!
//! The state space of bubble sort over a sequence of values is modelled as a
//! directed graph with one node per reachable arrangement and one edge per
//! legal single swap. A secondary causal graph re-expresses the same swaps as
//! events, connected when one event produces the state another consumes.
//!
//! ## Pipeline
//!
//! ```text
//! InputSelector ──▶ enumerate_states ──▶ Vec<State>
//!                                         │
//!                          ┌──────────────┴──────────────┐
//!                          ▼                             ▼
//!                 MultiwayGraph::build           CausalGraph::build
//! ```
//!
//! Enumeration is exhaustive up front: every state reachable from a
//! permutation of the input is itself a permutation of the input, so no node
//! is discovered lazily. The state count grows factorially; inputs beyond
//! eight or nine values are impractical and callers are expected to bound them.
//!
//! ## Example
//!
//! ```
//! use bubble_multiway_core::{enumerate_states, InputSelector, MultiwayGraph, State};
//!
//! let input = InputSelector::Size(3);
//! let graph = MultiwayGraph::build(&enumerate_states(&input));
//! assert_eq!(graph.node_count(), 6);
//! assert_eq!(graph.out_degree(&State::from([3, 2, 1])), Some(2));
//! assert!(graph.is_dag());
//! ```

mod causal;
mod enumerate;
mod error;
mod input;
mod multiway;
mod state;
mod transition;

pub use causal::{CausalGraph, CausalSummary, Event, EventId};
pub use enumerate::{enumerate_states, states_from_size, states_from_values, DistinctPermutations};
pub use error::{CoreResult, InputError};
pub use input::{distinct_permutation_count, parse_values, InputSelector};
pub use multiway::{MultiwayEdge, MultiwayGraph, MultiwayNode, MultiwaySummary};
pub use state::{inversions, State, Value};
pub use transition::{successors, transitions, Transition, Transitions};

pub use petgraph::stable_graph::NodeIndex;
