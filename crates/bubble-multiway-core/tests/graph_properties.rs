//! Property checks over whole graphs built from enumerated inputs.

use std::collections::HashMap;

use bubble_multiway_core::{
    enumerate_states, CausalGraph, InputSelector, MultiwayGraph, MultiwayNode, State,
};

fn inputs() -> Vec<InputSelector> {
    vec![
        InputSelector::Size(1),
        InputSelector::Size(3),
        InputSelector::Size(4),
        InputSelector::Values(vec![1, 1]),
        InputSelector::Values(vec![3, 1, 1, 2]),
        InputSelector::Values(vec![2, 2, 1, 1, 3]),
        InputSelector::Values(vec![-2, 5, 0, 5]),
    ]
}

#[test]
fn every_transition_removes_exactly_one_inversion() {
    for input in inputs() {
        let graph = MultiwayGraph::build(&enumerate_states(&input));
        for (source, target, index) in graph.transitions() {
            assert_eq!(source.inversions(), target.inversions() + 1);
            assert!(source.values()[index] > source.values()[index + 1]);
            assert_eq!(&source.swapped(index), target);
        }
        assert!(graph.is_dag(), "{input:?} should be acyclic");
    }
}

#[test]
fn every_state_reaches_the_sorted_arrangement() {
    for input in inputs() {
        let sorted = input.sorted_state();
        let graph = MultiwayGraph::build(&enumerate_states(&input));
        for state in graph.states() {
            assert!(graph.descendants(state).contains(&sorted));
        }
    }
}

#[test]
fn sorted_arrangement_is_the_unique_sink() {
    for input in inputs() {
        let sorted = input.sorted_state();
        let graph = MultiwayGraph::build(&enumerate_states(&input));
        let summary = graph.summary(&sorted);
        assert_eq!(summary.sinks, 1);
        assert!(summary.sorted_present);
        assert!(summary.sorted_is_sink);
        assert_eq!(summary.states as u128, input.estimated_state_count());
    }
}

#[test]
fn node_set_is_the_enumeration() {
    for input in inputs() {
        let states = enumerate_states(&input);
        let graph = MultiwayGraph::build(&states);
        let built: Vec<&State> = graph.states().collect();
        assert_eq!(built, states.iter().collect::<Vec<_>>());
        for state in &states {
            assert_eq!(state.len(), input.state_len());
        }
    }
}

#[test]
fn longest_chain_matches_max_inversions() {
    for input in inputs() {
        let graph = MultiwayGraph::build(&enumerate_states(&input));
        let top = graph.states().map(State::inversions).max().unwrap_or(0);
        assert_eq!(top, input.max_inversions());
    }
}

#[test]
fn max_inversions_bounds_every_state_not_just_the_input() {
    let input = InputSelector::Values(vec![3, 1, 1, 2]);
    let graph = MultiwayGraph::build(&enumerate_states(&input));

    let given = State::from([3, 1, 1, 2]);
    assert!(graph.contains(&given));
    assert_eq!(given.inversions(), input.input_inversions());
    assert_eq!(input.input_inversions(), 3);

    let top = State::from([3, 2, 1, 1]);
    assert_eq!(top.inversions(), input.max_inversions());
    assert_eq!(input.max_inversions(), 5);
    assert!(graph
        .states()
        .all(|s| s.inversions() <= input.max_inversions()));
}

#[test]
fn three_element_reference_graph() {
    let graph = MultiwayGraph::build(&enumerate_states(&InputSelector::Size(3)));
    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.out_degree(&State::from([3, 2, 1])), Some(2));
    assert_eq!(graph.out_degree(&State::from([1, 2, 3])), Some(0));
    let sinks = graph.sinks();
    assert_eq!(sinks.len(), 1);
    assert_eq!(
        graph.node(sinks[0]),
        Some(&MultiwayNode::State(State::from([1, 2, 3])))
    );
}

#[test]
fn super_source_preserves_real_structure() {
    for input in inputs() {
        let states = enumerate_states(&input);
        let plain = MultiwayGraph::build(&states);
        let augmented = plain.clone().with_super_source();

        let edges = |g: &MultiwayGraph| {
            let mut all: Vec<(State, State, usize)> = g
                .transitions()
                .map(|(s, t, i)| (s.clone(), t.clone(), i))
                .collect();
            all.sort();
            all
        };
        assert_eq!(edges(&plain), edges(&augmented));
        assert_eq!(augmented.edge_count(), plain.edge_count() + states.len());
        assert_eq!(augmented.sources().len(), 1);
    }
}

#[test]
fn causal_edges_follow_shared_states() {
    for input in inputs() {
        let states = enumerate_states(&input);
        let causal = CausalGraph::build(&states);
        let multiway = MultiwayGraph::build(&states);
        assert_eq!(causal.event_count(), multiway.transition_count());
        assert!(causal.is_dag());

        let mut expected: HashMap<&State, (usize, usize)> = HashMap::new();
        for event in causal.events() {
            expected.entry(&event.target).or_default().0 += 1;
            expected.entry(&event.source).or_default().1 += 1;
        }
        let total: usize = expected.values().map(|(p, c)| p * c).sum();
        assert_eq!(causal.edge_count(), total);
    }
}

#[test]
fn causal_event_ids_are_dense_and_stable() {
    let states = enumerate_states(&InputSelector::Values(vec![3, 2, 1]));
    let first = CausalGraph::build(&states);
    let second = CausalGraph::build(&states);
    for (i, event) in first.events().iter().enumerate() {
        assert_eq!(event.id.0, i);
    }
    assert_eq!(first.events(), second.events());
}
