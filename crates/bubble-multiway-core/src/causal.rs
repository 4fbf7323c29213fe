//! Causal graph: swap events as nodes, chained through shared states.
//!
//! Every `(state, applicable swap)` pair becomes one [`Event`]. An event that
//! produces state `s` is connected to every event that consumes `s`, so fan-in
//! and fan-out at `s` become a full bipartite join. Coincidental merges of
//! different histories into the same intermediate state count as causal.

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::State;
use crate::transition::transitions;

/// Identifier of an event, equal to its position in the event arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub usize);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One occurrence of a bubble swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identifier assigned during construction.
    pub id: EventId,
    /// State consumed by the swap.
    pub source: State,
    /// State produced by the swap.
    pub target: State,
    /// Left index of the swapped pair.
    pub swap_index: usize,
}

impl Event {
    /// Human-readable label, e.g. `321→231 @0`.
    pub fn label(&self) -> String {
        format!(
            "{}→{} @{}",
            self.source.compact_label(),
            self.target.compact_label(),
            self.swap_index
        )
    }

    /// Inversions of the consumed state.
    pub fn source_inversions(&self) -> usize {
        self.source.inversions()
    }

    /// Inversions of the produced state.
    pub fn target_inversions(&self) -> usize {
        self.target.inversions()
    }
}

/// Statistics reported after a causal build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalSummary {
    /// Number of events.
    pub events: usize,
    /// Number of causal edges.
    pub causal_edges: usize,
    /// Whether the causal graph has no directed cycle.
    pub is_dag: bool,
    /// Events with no causal predecessor.
    pub root_events: usize,
    /// Events with no causal successor.
    pub terminal_events: usize,
}

/// Directed graph of events connected through intermediate states.
#[derive(Debug, Clone, Default)]
pub struct CausalGraph {
    events: Vec<Event>,
    graph: DiGraph<EventId, ()>,
    producers: HashMap<State, Vec<EventId>>,
    consumers: HashMap<State, Vec<EventId>>,
}

impl CausalGraph {
    /// Build events and causal edges over `states`.
    ///
    /// Repeated states are visited once. Event ids follow the order of
    /// `states` and, within a state, the swap index.
    pub fn build(states: &[State]) -> Self {
        let mut seen: HashSet<&State> = HashSet::with_capacity(states.len());
        let unique: Vec<&State> = states.iter().filter(|s| seen.insert(*s)).collect();

        let mut causal = Self::default();
        for &source in &unique {
            for t in transitions(source) {
                let id = EventId(causal.events.len());
                let node = causal.graph.add_node(id);
                debug_assert_eq!(node.index(), id.0);

                causal.consumers.entry(source.clone()).or_default().push(id);
                causal.producers.entry(t.target.clone()).or_default().push(id);
                causal.events.push(Event {
                    id,
                    source: source.clone(),
                    target: t.target,
                    swap_index: t.swap_index,
                });
            }
        }

        for &intermediate in &unique {
            let (Some(incoming), Some(outgoing)) = (
                causal.producers.get(intermediate),
                causal.consumers.get(intermediate),
            ) else {
                continue;
            };
            for &e1 in incoming {
                for &e2 in outgoing {
                    causal
                        .graph
                        .add_edge(NodeIndex::new(e1.0), NodeIndex::new(e2.0), ());
                }
            }
        }

        debug!(
            events = causal.events.len(),
            causal_edges = causal.graph.edge_count(),
            "Built causal graph"
        );
        causal
    }

    /// The underlying petgraph graph; node index `i` holds `EventId(i)`.
    pub fn graph(&self) -> &DiGraph<EventId, ()> {
        &self.graph
    }

    /// All events in id order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Event by id.
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(id.0)
    }

    /// Number of events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Number of causal edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Causal edges as `(cause, effect)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (EventId, EventId)> + '_ {
        self.graph.raw_edges().iter().map(|edge| {
            (
                self.graph[edge.source()],
                self.graph[edge.target()],
            )
        })
    }

    /// Whether `cause -> effect` is a causal edge.
    pub fn has_edge(&self, cause: EventId, effect: EventId) -> bool {
        self.graph
            .find_edge(NodeIndex::new(cause.0), NodeIndex::new(effect.0))
            .is_some()
    }

    /// Events that produce `state`.
    pub fn producers_of(&self, state: &State) -> &[EventId] {
        self.producers.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Events that consume `state`.
    pub fn consumers_of(&self, state: &State) -> &[EventId] {
        self.consumers.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First event matching `(source, target, swap_index)`.
    pub fn find_event(&self, source: &State, target: &State, swap_index: usize) -> Option<&Event> {
        self.consumers_of(source)
            .iter()
            .filter_map(|&id| self.event(id))
            .find(|e| &e.target == target && e.swap_index == swap_index)
    }

    /// Whether the causal graph is acyclic.
    pub fn is_dag(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Summary statistics.
    pub fn summary(&self) -> CausalSummary {
        let count_without = |dir: Direction| {
            self.graph
                .node_indices()
                .filter(|&idx| self.graph.neighbors_directed(idx, dir).next().is_none())
                .count()
        };
        CausalSummary {
            events: self.event_count(),
            causal_edges: self.edge_count(),
            is_dag: self.is_dag(),
            root_events: count_without(Direction::Incoming),
            terminal_events: count_without(Direction::Outgoing),
        }
    }
}
