// tests/property_scheduler.rs

//! Property tests over random DAGs: the scheduler terminates, respects
//! dependency order, and skips exactly the cones of failed nodes.

use std::collections::{HashMap, HashSet, VecDeque};

use proptest::prelude::*;

use dagrun::dag::RunScheduler;
use dagrun::engine::NodeOutcome;
use dagrun::graph::Graph;
use dagrun::types::{NodeState, RunId};

use dagrun_test_utils::builders::GraphBuilder;

// Strategy to generate a valid DAG. Acyclicity is guaranteed by only letting
// node N depend on nodes 0..N-1.
fn dag_strategy(max_nodes: usize) -> impl Strategy<Value = Graph> {
    (1..=max_nodes).prop_flat_map(|num_nodes| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_nodes),
            num_nodes,
        );

        deps_strat.prop_map(move |raw_deps| {
            let mut builder = GraphBuilder::new();
            for i in 0..num_nodes {
                builder = builder.with_node(&format!("node_{i}"), "noop");
            }
            for (i, potential_deps) in raw_deps.into_iter().enumerate() {
                // Sanitize dependencies: only allow deps < i.
                let mut valid_deps = HashSet::new();
                for dep_idx in potential_deps {
                    if i > 0 {
                        valid_deps.insert(dep_idx % i);
                    }
                }
                for dep_idx in valid_deps {
                    builder = builder.with_edge(&format!("node_{dep_idx}"), &format!("node_{i}"));
                }
            }
            builder.build()
        })
    })
}

/// Transitive dependents per node, recomputed straight from the edge list.
fn transitive_dependents(graph: &Graph) -> HashMap<String, HashSet<String>> {
    let mut direct: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        direct
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut result = HashMap::new();
    for node in &graph.nodes {
        let mut cone = HashSet::new();
        let mut stack: Vec<&str> = direct.get(node.id.as_str()).cloned().unwrap_or_default();
        while let Some(current) = stack.pop() {
            if cone.insert(current.to_string()) {
                if let Some(next) = direct.get(current) {
                    stack.extend(next.iter().copied());
                }
            }
        }
        result.insert(node.id.clone(), cone);
    }
    result
}

proptest! {
    #[test]
    fn topo_order_puts_every_edge_source_first(graph in dag_strategy(10)) {
        let dag = dagrun::dag::DagGraph::from_graph(&graph);
        let order = dag.topo_order().expect("generated DAG is acyclic");

        prop_assert_eq!(order.len(), graph.nodes.len());

        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(pos, id)| (id.as_str(), pos))
            .collect();

        for edge in &graph.edges {
            prop_assert!(
                position[edge.source.as_str()] < position[edge.target.as_str()],
                "edge {} -> {} violated by order",
                edge.source,
                edge.target
            );
        }
    }

    #[test]
    fn scheduler_terminates_and_respects_dependencies(
        graph in dag_strategy(10),
        failing_indices in proptest::collection::vec(0..10usize, 0..5),
    ) {
        let node_names: Vec<String> = graph.node_ids().map(str::to_string).collect();
        let failing: HashSet<String> = failing_indices
            .iter()
            .filter(|&&i| i < node_names.len())
            .map(|&i| node_names[i].clone())
            .collect();

        let dependencies: HashMap<String, Vec<String>> = node_names
            .iter()
            .map(|name| {
                let deps = graph
                    .edges
                    .iter()
                    .filter(|e| e.target == *name)
                    .map(|e| e.source.clone())
                    .collect();
                (name.clone(), deps)
            })
            .collect();

        let mut scheduler = RunScheduler::new(&graph, RunId::new()).expect("generated DAG is acyclic");

        let mut succeeded: HashSet<String> = HashSet::new();
        let mut executing: VecDeque<String> = VecDeque::new();

        let step = scheduler.start();
        for scheduled in &step.newly_ready {
            // A dispatched node's dependencies must all have succeeded.
            for dep in &dependencies[&scheduled.name] {
                prop_assert!(
                    succeeded.contains(dep),
                    "node {} dispatched before dependency {} succeeded",
                    scheduled.name,
                    dep
                );
            }
            executing.push_back(scheduled.name.clone());
        }

        let mut steps = 0;
        let max_steps = 1000;

        while !scheduler.is_terminal() && steps < max_steps {
            steps += 1;

            let node = match executing.pop_front() {
                Some(n) => n,
                None => {
                    // Nothing in flight but not terminal would be a stuck
                    // scheduler.
                    prop_assert!(false, "scheduler stuck: no executing nodes but run not terminal");
                    unreachable!();
                }
            };

            let outcome = if failing.contains(&node) {
                NodeOutcome::Failed
            } else {
                NodeOutcome::Success
            };
            if outcome == NodeOutcome::Success {
                succeeded.insert(node.clone());
            }

            let step = scheduler.complete(&node, outcome);
            for scheduled in &step.newly_ready {
                for dep in &dependencies[&scheduled.name] {
                    prop_assert!(
                        succeeded.contains(dep),
                        "node {} dispatched before dependency {} succeeded",
                        scheduled.name,
                        dep
                    );
                }
                executing.push_back(scheduled.name.clone());
            }
        }

        prop_assert!(steps < max_steps, "simulation did not terminate");
        prop_assert!(scheduler.is_terminal());

        // Every node ended in a terminal state.
        let states = scheduler.states();
        for (name, state) in &states {
            prop_assert!(
                state.is_terminal(),
                "node {} ended non-terminal: {:?}",
                name,
                state
            );
        }

        // With no failures, everything succeeds.
        if failing.is_empty() {
            for (name, state) in &states {
                prop_assert_eq!(
                    *state,
                    NodeState::Success,
                    "node {} should have succeeded",
                    name
                );
            }
        }

        // Every transitive dependent of a failed node was skipped.
        let cones = transitive_dependents(&graph);
        for (name, state) in &states {
            if *state == NodeState::Failed {
                for dependent in &cones[name] {
                    prop_assert_eq!(
                        states[dependent],
                        NodeState::Skipped,
                        "dependent {} of failed {} not skipped",
                        dependent,
                        name
                    );
                }
            }
        }
    }
}
