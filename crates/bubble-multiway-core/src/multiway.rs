//! Multiway graph: one node per state, one edge per bubble transition.

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Dfs, EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::State;
use crate::transition::transitions;

/// Node weight of the multiway graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiwayNode {
    /// A value-sequence state.
    State(State),
    /// Synthetic node pointing at every state. Never a sort state.
    SuperSource,
}

impl MultiwayNode {
    /// The wrapped state, if this is not the super-source.
    pub fn state(&self) -> Option<&State> {
        match self {
            Self::State(state) => Some(state),
            Self::SuperSource => None,
        }
    }

    /// Whether this is the synthetic super-source.
    pub fn is_super_source(&self) -> bool {
        matches!(self, Self::SuperSource)
    }
}

/// Edge weight of the multiway graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiwayEdge {
    /// A bubble transition swapping positions `index` and `index + 1`.
    Swap { index: usize },
    /// Structural edge from the super-source.
    Start,
}

impl MultiwayEdge {
    /// Swap index for transitions, `None` for start edges.
    pub fn swap_index(&self) -> Option<usize> {
        match self {
            Self::Swap { index } => Some(*index),
            Self::Start => None,
        }
    }
}

/// Statistics reported after a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiwaySummary {
    /// Number of state nodes.
    pub states: usize,
    /// Number of nodes, super-source included.
    pub nodes: usize,
    /// Number of edges, start edges included.
    pub edges: usize,
    /// Whether the graph has no directed cycle.
    pub is_dag: bool,
    /// Nodes with no incoming edge.
    pub sources: usize,
    /// Nodes with no outgoing edge.
    pub sinks: usize,
    /// Whether the reference sorted state is a node.
    pub sorted_present: bool,
    /// Whether the reference sorted state has out-degree zero.
    pub sorted_is_sink: bool,
}

/// Deduplicated directed graph of states and bubble transitions.
#[derive(Debug, Clone, Default)]
pub struct MultiwayGraph {
    graph: StableDiGraph<MultiwayNode, MultiwayEdge>,
    index: HashMap<State, NodeIndex>,
    order: Vec<NodeIndex>,
    super_source: Option<NodeIndex>,
}

impl MultiwayGraph {
    /// Build the graph over `states`.
    ///
    /// Every supplied state becomes a node, even if no transition reaches it.
    /// Repeated states collapse into one node.
    pub fn build(states: &[State]) -> Self {
        let mut graph = Self::default();
        for state in states {
            graph.ensure_node(state);
        }
        for state in states {
            let from = graph.index[state];
            for t in transitions(state) {
                let to = graph.ensure_node(&t.target);
                if graph.graph.find_edge(from, to).is_none() {
                    graph
                        .graph
                        .add_edge(from, to, MultiwayEdge::Swap { index: t.swap_index });
                }
            }
        }
        debug!(
            nodes = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            "Built multiway graph"
        );
        graph
    }

    fn ensure_node(&mut self, state: &State) -> NodeIndex {
        if let Some(&idx) = self.index.get(state) {
            return idx;
        }
        let idx = self.graph.add_node(MultiwayNode::State(state.clone()));
        self.index.insert(state.clone(), idx);
        self.order.push(idx);
        idx
    }

    /// Attach the super-source with one start edge to every state.
    ///
    /// Existing nodes and edges are untouched. Calling this twice is a no-op.
    pub fn add_super_source(&mut self) -> NodeIndex {
        if let Some(idx) = self.super_source {
            return idx;
        }
        let source = self.graph.add_node(MultiwayNode::SuperSource);
        for &idx in &self.order {
            self.graph.add_edge(source, idx, MultiwayEdge::Start);
        }
        self.super_source = Some(source);
        source
    }

    /// Builder-style variant of [`add_super_source`](Self::add_super_source).
    pub fn with_super_source(mut self) -> Self {
        self.add_super_source();
        self
    }

    /// The underlying petgraph graph.
    pub fn graph(&self) -> &StableDiGraph<MultiwayNode, MultiwayEdge> {
        &self.graph
    }

    /// Index of the super-source, if attached.
    pub fn super_source(&self) -> Option<NodeIndex> {
        self.super_source
    }

    /// Node index of a state.
    pub fn node_index(&self, state: &State) -> Option<NodeIndex> {
        self.index.get(state).copied()
    }

    /// Node weight at an index.
    pub fn node(&self, idx: NodeIndex) -> Option<&MultiwayNode> {
        self.graph.node_weight(idx)
    }

    /// Whether `state` is a node.
    pub fn contains(&self, state: &State) -> bool {
        self.index.contains_key(state)
    }

    /// States in insertion order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.order
            .iter()
            .filter_map(|&idx| self.graph[idx].state())
    }

    /// Bubble transitions as `(source, target, swap_index)`, start edges excluded.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &State, usize)> {
        self.graph.edge_references().filter_map(|edge| {
            let index = edge.weight().swap_index()?;
            let source = self.graph[edge.source()].state()?;
            let target = self.graph[edge.target()].state()?;
            Some((source, target, index))
        })
    }

    /// Total nodes, super-source included.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total edges, start edges included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of state nodes.
    pub fn state_count(&self) -> usize {
        self.order.len()
    }

    /// Number of bubble-transition edges.
    pub fn transition_count(&self) -> usize {
        self.graph
            .edge_references()
            .filter(|edge| edge.weight().swap_index().is_some())
            .count()
    }

    /// Outgoing bubble transitions of a state.
    pub fn out_degree(&self, state: &State) -> Option<usize> {
        let idx = self.node_index(state)?;
        Some(self.graph.edges_directed(idx, Direction::Outgoing).count())
    }

    /// Incoming edges of a state, start edge included when attached.
    pub fn in_degree(&self, state: &State) -> Option<usize> {
        let idx = self.node_index(state)?;
        Some(self.graph.edges_directed(idx, Direction::Incoming).count())
    }

    /// Nodes without incoming edges.
    pub fn sources(&self) -> Vec<NodeIndex> {
        self.nodes_without(Direction::Incoming)
    }

    /// Nodes without outgoing edges.
    pub fn sinks(&self) -> Vec<NodeIndex> {
        self.nodes_without(Direction::Outgoing)
    }

    fn nodes_without(&self, dir: Direction) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph.edges_directed(idx, dir).next().is_none())
            .collect()
    }

    /// Whether the graph is acyclic.
    pub fn is_dag(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// States reachable from `state`, itself included.
    pub fn descendants(&self, state: &State) -> HashSet<State> {
        let Some(start) = self.node_index(state) else {
            return HashSet::new();
        };
        let mut dfs = Dfs::new(&self.graph, start);
        let mut found = HashSet::new();
        while let Some(idx) = dfs.next(&self.graph) {
            if let Some(s) = self.graph[idx].state() {
                found.insert(s.clone());
            }
        }
        found
    }

    /// Summary statistics, checking `sorted` as the expected unique sink.
    pub fn summary(&self, sorted: &State) -> MultiwaySummary {
        let sorted_idx = self.node_index(sorted);
        MultiwaySummary {
            states: self.state_count(),
            nodes: self.node_count(),
            edges: self.edge_count(),
            is_dag: self.is_dag(),
            sources: self.sources().len(),
            sinks: self.sinks().len(),
            sorted_present: sorted_idx.is_some(),
            sorted_is_sink: sorted_idx.is_some_and(|idx| {
                self.graph
                    .edges_directed(idx, Direction::Outgoing)
                    .next()
                    .is_none()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::{states_from_size, states_from_values};

    #[test]
    fn test_size_three() {
        let g = MultiwayGraph::build(&states_from_size(3));
        assert_eq!(g.node_count(), 6);
        assert_eq!(g.edge_count(), 6);
        assert_eq!(g.out_degree(&State::from([3, 2, 1])), Some(2));
        assert_eq!(g.out_degree(&State::from([1, 2, 3])), Some(0));

        let sinks = g.sinks();
        assert_eq!(sinks.len(), 1);
        assert_eq!(
            g.node(sinks[0]).and_then(MultiwayNode::state),
            Some(&State::from([1, 2, 3]))
        );
    }

    #[test]
    fn test_single_duplicate_pair() {
        let g = MultiwayGraph::build(&states_from_values(&[1, 1]));
        let summary = g.summary(&State::from([1, 1]));
        assert_eq!(summary.nodes, 1);
        assert_eq!(summary.edges, 0);
        assert_eq!(summary.sources, 1);
        assert_eq!(summary.sinks, 1);
        assert!(summary.sorted_is_sink);
    }

    #[test]
    fn test_edges_independent_of_state_order() {
        let forward = states_from_values(&[3, 1, 1, 2]);
        let mut backward = forward.clone();
        backward.reverse();

        let collect = |g: &MultiwayGraph| {
            let mut edges: Vec<(State, State, usize)> = g
                .transitions()
                .map(|(s, t, i)| (s.clone(), t.clone(), i))
                .collect();
            edges.sort();
            edges
        };
        assert_eq!(
            collect(&MultiwayGraph::build(&forward)),
            collect(&MultiwayGraph::build(&backward))
        );
    }

    #[test]
    fn test_repeated_states_collapse() {
        let state = State::from([2, 1]);
        let g = MultiwayGraph::build(&[state.clone(), state.clone(), State::from([1, 2])]);
        assert_eq!(g.state_count(), 2);
        assert_eq!(g.transition_count(), 1);
    }

    #[test]
    fn test_unlisted_successor_becomes_node() {
        let g = MultiwayGraph::build(&[State::from([2, 1])]);
        assert!(g.contains(&State::from([1, 2])));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_super_source_only_adds_start_edges() {
        let states = states_from_size(3);
        let plain = MultiwayGraph::build(&states);
        let augmented = plain.clone().with_super_source();

        assert_eq!(augmented.node_count(), plain.node_count() + 1);
        assert_eq!(augmented.edge_count(), plain.edge_count() + states.len());
        assert_eq!(augmented.transition_count(), plain.transition_count());
        for state in &states {
            assert_eq!(augmented.out_degree(state), plain.out_degree(state));
            assert_eq!(
                augmented.in_degree(state).unwrap(),
                plain.in_degree(state).unwrap() + 1
            );
        }

        let sources = augmented.sources();
        assert_eq!(sources, vec![augmented.super_source().unwrap()]);
        assert!(augmented.is_dag());
    }

    #[test]
    fn test_super_source_is_idempotent() {
        let mut g = MultiwayGraph::build(&states_from_size(2));
        let first = g.add_super_source();
        let second = g.add_super_source();
        assert_eq!(first, second);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn test_descendants_reach_sorted_state() {
        let g = MultiwayGraph::build(&states_from_values(&[2, 1, 2, 3]));
        let sorted = State::from([1, 2, 2, 3]);
        for state in g.states() {
            assert!(g.descendants(state).contains(&sorted));
        }
    }
}
