//! Response DTOs for operations.
//!
//! Responses own the built graph together with the statistics a caller
//! reports, so printing a summary never re-walks the graph.

use std::path::PathBuf;

use bubble_multiway_core::{
    CausalGraph, CausalSummary, InputSelector, MultiwayGraph, MultiwaySummary, State, Value,
};
use serde::{Deserialize, Serialize};

use crate::export::ExportFormat;

/// Response from a multiway build.
#[derive(Debug, Clone)]
pub struct MultiwayResponse {
    /// The input the graph was built from.
    pub input: InputSelector,

    /// The built graph.
    pub graph: MultiwayGraph,

    /// Node, edge, source and sink statistics.
    pub summary: MultiwaySummary,

    /// Inversions of the most unsorted arrangement of the input.
    pub max_inversions: usize,

    /// The fully sorted state every path ends in.
    pub sorted_state: State,
}

impl MultiwayResponse {
    /// Input values in their given order.
    pub fn input_values(&self) -> Vec<Value> {
        self.input.input_values()
    }

    /// Get node count, including the super-source.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count, including start edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Response from a causal build.
#[derive(Debug, Clone)]
pub struct CausalResponse {
    /// The input the graph was built from.
    pub input: InputSelector,

    /// The built event graph.
    pub graph: CausalGraph,

    /// Event and edge statistics.
    pub summary: CausalSummary,

    /// Number of states the events were drawn from.
    pub state_count: usize,
}

impl CausalResponse {
    /// Input values in their given order.
    pub fn input_values(&self) -> Vec<Value> {
        self.input.input_values()
    }
}

/// Response from writing a graph file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportResponse {
    /// Where the file was written.
    pub path: PathBuf,

    /// Format used.
    pub format: ExportFormat,

    /// Size of the written file.
    pub bytes: u64,
}
