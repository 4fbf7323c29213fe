//! Layered layout by inversion count.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use bubble_multiway_core::{CausalGraph, EventId, MultiwayGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{LayoutError, Position, Result};

/// Spacing parameters for the layered layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical distance between consecutive layers.
    pub layer_spacing: f32,
    /// Horizontal distance between neighbours within a layer.
    pub node_spacing: f32,
    /// Height of the super-source above the top layer, in layer spacings.
    pub super_source_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layer_spacing: 1.0,
            node_spacing: 1.0,
            super_source_gap: 1.0,
        }
    }
}

impl LayoutConfig {
    /// Reject non-positive or non-finite spacings.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("layer_spacing", self.layer_spacing),
            ("node_spacing", self.node_spacing),
            ("super_source_gap", self.super_source_gap),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }
}

/// One horizontal band of nodes sharing an inversion count.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<K> {
    /// Inversion count shared by every member.
    pub inversions: usize,
    /// Members from left to right.
    pub members: Vec<K>,
}

/// Node → coordinate assignment with layer bookkeeping.
///
/// Layer 0 holds the highest inversion count and sits at `y = 0`; later
/// layers descend. Purely advisory: nothing here checks the graph's edges.
#[derive(Debug, Clone)]
pub struct LayeredLayout<K> {
    positions: HashMap<K, Position>,
    layer_of: HashMap<K, usize>,
    layers: Vec<Layer<K>>,
}

impl<K> LayeredLayout<K>
where
    K: Clone + Eq + Hash,
{
    /// Group `(key, inversions, tie_break)` entries into layers and place them.
    ///
    /// Layers are ordered by descending inversion count. Within a layer,
    /// members are sorted by `tie_break` and centred on `x = 0`.
    pub fn from_entries<T, I>(entries: I, config: &LayoutConfig) -> Self
    where
        T: Ord,
        I: IntoIterator<Item = (K, usize, T)>,
    {
        let mut grouped: BTreeMap<usize, Vec<(T, K)>> = BTreeMap::new();
        for (key, inversions, tie) in entries {
            grouped.entry(inversions).or_default().push((tie, key));
        }

        let mut layout = Self {
            positions: HashMap::new(),
            layer_of: HashMap::new(),
            layers: Vec::with_capacity(grouped.len()),
        };

        for (yi, (inversions, mut row)) in grouped.into_iter().rev().enumerate() {
            row.sort_by(|a, b| a.0.cmp(&b.0));
            let m = row.len();
            let y = -(yi as f32) * config.layer_spacing;
            let mut members = Vec::with_capacity(m);
            for (i, (_, key)) in row.into_iter().enumerate() {
                let x = (i as f32 - (m as f32 - 1.0) / 2.0) * config.node_spacing;
                layout.positions.insert(key.clone(), Position::new(x, y));
                layout.layer_of.insert(key.clone(), yi);
                members.push(key);
            }
            layout.layers.push(Layer {
                inversions,
                members,
            });
        }
        layout
    }

    /// Place `key` centred above the top layer, outside any layer.
    pub fn place_above(&mut self, key: K, config: &LayoutConfig) {
        let y = config.super_source_gap * config.layer_spacing;
        self.positions.insert(key, Position::new(0.0, y));
    }

    /// Coordinate of a node.
    pub fn position(&self, key: &K) -> Option<Position> {
        self.positions.get(key).copied()
    }

    /// Layer index of a node (0 = most inversions); `None` for nodes outside layers.
    pub fn layer_index(&self, key: &K) -> Option<usize> {
        self.layer_of.get(key).copied()
    }

    /// Layers from top to bottom.
    pub fn layers(&self) -> &[Layer<K>] {
        &self.layers
    }

    /// All placed nodes.
    pub fn positions(&self) -> &HashMap<K, Position> {
        &self.positions
    }

    /// Number of placed nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bounding box as `(min, max)` corners.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut iter = self.positions.values();
        let first = *iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| {
            (
                Position::new(min.x.min(p.x), min.y.min(p.y)),
                Position::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}

/// Layout a multiway graph: layers by state inversions, ties by state order.
///
/// The super-source, if present, is placed above every layer.
pub fn layout_multiway(graph: &MultiwayGraph, config: &LayoutConfig) -> LayeredLayout<NodeIndex> {
    let entries = graph
        .states()
        .filter_map(|state| Some((graph.node_index(state)?, state.inversions(), state.clone())));
    let mut layout = LayeredLayout::from_entries(entries, config);
    if let Some(source) = graph.super_source() {
        layout.place_above(source, config);
    }
    debug!(
        nodes = layout.len(),
        layers = layout.layers().len(),
        "Computed multiway layout"
    );
    layout
}

/// Layout a causal graph: layers by source-state inversions, ties by event label.
pub fn layout_causal(graph: &CausalGraph, config: &LayoutConfig) -> LayeredLayout<EventId> {
    let entries = graph
        .events()
        .iter()
        .map(|event| (event.id, event.source_inversions(), event.label()));
    let layout = LayeredLayout::from_entries(entries, config);
    debug!(
        events = layout.len(),
        layers = layout.layers().len(),
        "Computed causal layout"
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_multiway_core::{states_from_size, states_from_values, State};

    #[test]
    fn test_default_config_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = LayoutConfig {
            node_spacing: 0.0,
            ..LayoutConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(LayoutError::InvalidConfig {
                field: "node_spacing",
                value: 0.0
            })
        );
        let config = LayoutConfig {
            layer_spacing: f32::NAN,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layers_descend_by_inversions() {
        let graph = MultiwayGraph::build(&states_from_size(3));
        let layout = layout_multiway(&graph, &LayoutConfig::default());
        let counts: Vec<usize> = layout.layers().iter().map(|l| l.inversions).collect();
        assert_eq!(counts, vec![3, 2, 1, 0]);

        let top = graph.node_index(&State::from([3, 2, 1])).unwrap();
        assert_eq!(layout.position(&top), Some(Position::new(0.0, 0.0)));
        let bottom = graph.node_index(&State::from([1, 2, 3])).unwrap();
        assert_eq!(layout.position(&bottom), Some(Position::new(0.0, -3.0)));
    }

    #[test]
    fn test_rows_are_centred_and_ordered() {
        let graph = MultiwayGraph::build(&states_from_size(3));
        let layout = layout_multiway(&graph, &LayoutConfig::default());
        let left = graph.node_index(&State::from([2, 3, 1])).unwrap();
        let right = graph.node_index(&State::from([3, 1, 2])).unwrap();
        assert_eq!(layout.position(&left), Some(Position::new(-0.5, -1.0)));
        assert_eq!(layout.position(&right), Some(Position::new(0.5, -1.0)));
    }

    #[test]
    fn test_multiway_edges_flow_downward() {
        let graph = MultiwayGraph::build(&states_from_values(&[3, 1, 1, 2, 4]));
        let layout = layout_multiway(&graph, &LayoutConfig::default());
        for (source, target, _) in graph.transitions() {
            let s = layout.layer_index(&graph.node_index(source).unwrap()).unwrap();
            let t = layout.layer_index(&graph.node_index(target).unwrap()).unwrap();
            assert!(t >= s);
        }
    }

    #[test]
    fn test_causal_edges_flow_downward() {
        let graph = CausalGraph::build(&states_from_size(4));
        let layout = layout_causal(&graph, &LayoutConfig::default());
        assert_eq!(layout.len(), graph.event_count());
        for (cause, effect) in graph.edges() {
            assert!(layout.layer_index(&effect).unwrap() >= layout.layer_index(&cause).unwrap());
        }
    }

    #[test]
    fn test_super_source_sits_above_layers() {
        let graph = MultiwayGraph::build(&states_from_size(3)).with_super_source();
        let config = LayoutConfig::default();
        let layout = layout_multiway(&graph, &config);
        let source = graph.super_source().unwrap();

        assert_eq!(layout.layer_index(&source), None);
        let top = layout.position(&source).unwrap();
        assert_eq!(top, Position::new(0.0, 1.0));
        assert!(layout
            .positions()
            .iter()
            .filter(|(k, _)| **k != source)
            .all(|(_, p)| p.y < top.y));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let graph = CausalGraph::build(&states_from_values(&[2, 1, 2, 3]));
        let config = LayoutConfig::default();
        let a = layout_causal(&graph, &config);
        let b = layout_causal(&graph, &config);
        for event in graph.events() {
            assert_eq!(a.position(&event.id), b.position(&event.id));
        }
    }

    #[test]
    fn test_bounds() {
        let graph = MultiwayGraph::build(&states_from_size(3));
        let layout = layout_multiway(&graph, &LayoutConfig::default());
        let (min, max) = layout.bounds().unwrap();
        assert_eq!(min, Position::new(-0.5, -3.0));
        assert_eq!(max, Position::new(0.5, 0.0));
    }
}
