//! Property-based tests for resolver invariants.
//!
//! These tests verify the behavioral contracts of dependency resolution:
//! - Every task follows all of its dependencies
//! - The result is exactly the closure of the requested roots
//! - Output is deterministic and free of duplicates
//! - Cycles are always detected

#![allow(clippy::expect_used)]

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use taskplan_task_graph::{DependencyGraph, Error, TaskCatalog, resolve};

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Generate a valid task name (lowercase alphanumeric with dashes).
fn task_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,10}".prop_map(String::from)
}

/// Generate a DAG with a specified number of tasks.
///
/// The strategy ensures no cycles by only allowing dependencies on tasks
/// with lower indices. Tasks are returned in a shuffled registration order
/// so that dependencies are frequently declared before they are registered.
fn dag_strategy(
    min_tasks: usize,
    max_tasks: usize,
) -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    (min_tasks..=max_tasks).prop_flat_map(|task_count| {
        proptest::collection::vec(task_name_strategy(), task_count).prop_flat_map(move |names| {
            // Deduplicate names by appending index
            let unique_names: Vec<String> = names
                .into_iter()
                .enumerate()
                .map(|(i, name)| format!("{name}-{i}"))
                .collect();

            let dep_strategies: Vec<_> = (0..task_count)
                .map(|i| {
                    if i == 0 {
                        Just(vec![]).boxed()
                    } else {
                        let earlier_names: Vec<String> = unique_names[..i].to_vec();
                        proptest::collection::vec(
                            proptest::sample::select(earlier_names),
                            0..=i.min(4),
                        )
                        .prop_map(|deps| {
                            let mut seen = HashSet::new();
                            deps.into_iter().filter(|d| seen.insert(d.clone())).collect()
                        })
                        .boxed()
                    }
                })
                .collect();

            let names_clone = unique_names.clone();
            dep_strategies
                .prop_map(move |all_deps| {
                    names_clone
                        .iter()
                        .cloned()
                        .zip(all_deps)
                        .collect::<Vec<_>>()
                })
                .prop_shuffle()
        })
    })
}

/// Generate a ring of tasks where each depends on the previous and the
/// first depends on the last.
fn cyclic_catalog_strategy() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    (2..=6_usize).prop_map(|task_count| {
        let names: Vec<String> = (0..task_count).map(|i| format!("ring-{i}")).collect();
        (0..task_count)
            .map(|i| {
                let dep = if i == 0 {
                    names[task_count - 1].clone()
                } else {
                    names[i - 1].clone()
                };
                (names[i].clone(), vec![dep])
            })
            .collect()
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

fn build_catalog(tasks: &[(String, Vec<String>)]) -> TaskCatalog {
    let mut builder = TaskCatalog::builder();
    for (name, deps) in tasks {
        builder
            .register(name.clone(), deps.iter().cloned())
            .expect("generated names are unique");
    }
    builder.build()
}

fn closure(tasks: &[(String, Vec<String>)], roots: &[String]) -> HashSet<String> {
    let deps: HashMap<&str, &[String]> = tasks
        .iter()
        .map(|(name, deps)| (name.as_str(), deps.as_slice()))
        .collect();

    let mut all = HashSet::new();
    let mut frontier: Vec<&str> = roots.iter().map(String::as_str).collect();
    while let Some(name) = frontier.pop() {
        if all.insert(name.to_string()) {
            frontier.extend(deps[name].iter().map(String::as_str));
        }
    }
    all
}

// =============================================================================
// Property Tests: Ordering
// =============================================================================

proptest! {
    /// Contract: every dependency appears strictly before its dependent.
    #[test]
    fn resolve_respects_dependencies(tasks in dag_strategy(1, 20)) {
        let catalog = build_catalog(&tasks);
        let order = resolve::<&str>(&catalog, &[]).expect("DAG should resolve");

        for (name, deps) in &tasks {
            let task_pos = order.position(name).expect("Task should be in output");
            for dep in deps {
                let dep_pos = order.position(dep).expect("Dependency should be in output");
                prop_assert!(
                    dep_pos < task_pos,
                    "Dependency '{}' (pos {}) should come before '{}' (pos {})",
                    dep, dep_pos, name, task_pos
                );
            }
        }
    }

    /// Contract: full mode emits every task exactly once.
    #[test]
    fn full_mode_covers_catalog(tasks in dag_strategy(1, 25)) {
        let catalog = build_catalog(&tasks);
        let order = resolve::<&str>(&catalog, &[]).expect("DAG should resolve");

        prop_assert_eq!(order.len(), tasks.len());
        let unique: HashSet<&str> = order.iter().collect();
        prop_assert_eq!(unique.len(), order.len(), "Output must not contain duplicates");
    }

    /// Contract: a root set resolves to exactly the union of its closures.
    #[test]
    fn resolve_emits_exact_closure(
        tasks in dag_strategy(1, 20),
        picks in proptest::collection::vec(any::<proptest::sample::Index>(), 1..4),
    ) {
        let catalog = build_catalog(&tasks);
        let roots: Vec<String> = picks.iter().map(|idx| idx.get(&tasks).0.clone()).collect();

        let order = resolve(&catalog, &roots).expect("DAG should resolve");
        let emitted: HashSet<String> = order.iter().map(String::from).collect();

        prop_assert_eq!(emitted.len(), order.len(), "Output must not contain duplicates");
        prop_assert_eq!(emitted, closure(&tasks, &roots));
    }

    /// Contract: adding a root that is already in the closure changes nothing.
    #[test]
    fn redundant_root_is_idempotent(
        tasks in dag_strategy(2, 20),
        pick in any::<proptest::sample::Index>(),
    ) {
        let catalog = build_catalog(&tasks);
        let (root, deps) = pick.get(&tasks);
        prop_assume!(!deps.is_empty());

        let alone = resolve(&catalog, &[root.as_str()]).expect("DAG should resolve");
        let extended = resolve(&catalog, &[root.as_str(), deps[0].as_str()])
            .expect("DAG should resolve");
        prop_assert_eq!(alone, extended);
    }

    /// Contract: resolver output is a valid order of the petgraph view.
    #[test]
    fn resolver_agrees_with_graph(tasks in dag_strategy(1, 20)) {
        let catalog = build_catalog(&tasks);
        let graph = DependencyGraph::from_catalog(&catalog);
        prop_assert!(graph.validate().is_valid);
        prop_assert!(graph.topological_order().is_some());

        let order = resolve::<&str>(&catalog, &[]).expect("DAG should resolve");
        for name in order.iter() {
            for dependent in graph.dependents(name) {
                prop_assert!(order.position(name) < order.position(dependent));
            }
        }
    }
}

// =============================================================================
// Property Tests: Failures
// =============================================================================

proptest! {
    /// Contract: every task on a dependency ring reports a cycle.
    #[test]
    fn cycle_detection_identifies_rings(
        tasks in cyclic_catalog_strategy(),
        pick in any::<proptest::sample::Index>(),
    ) {
        let catalog = build_catalog(&tasks);
        let root = pick.get(&tasks).0.clone();

        match resolve(&catalog, &[root.as_str()]) {
            Err(Error::CircularDependency { path, task }) => {
                prop_assert_eq!(path.len(), tasks.len());
                prop_assert_eq!(&path[0], &task);
                prop_assert_eq!(&task, &root);
            }
            other => prop_assert!(false, "expected a cycle, got {:?}", other),
        }

        prop_assert!(!catalog.validate().is_valid);
    }

    /// Contract: a dangling dependency is reported with its requester.
    #[test]
    fn unknown_dependency_is_reported(tasks in dag_strategy(1, 15)) {
        let mut with_dangling = tasks.clone();
        with_dangling.push(("dangling-root".to_string(), vec!["nowhere".to_string()]));
        let catalog = build_catalog(&with_dangling);

        let err = resolve::<&str>(&catalog, &[]).expect_err("resolution must fail");
        prop_assert_eq!(
            err,
            Error::unknown("nowhere", vec!["dangling-root".to_string()])
        );
    }
}

// =============================================================================
// Determinism Tests
// =============================================================================

proptest! {
    /// Contract: resolution is deterministic for the same catalog and roots.
    #[test]
    fn resolve_is_deterministic(tasks in dag_strategy(2, 15)) {
        let first = resolve::<&str>(&build_catalog(&tasks), &[]).expect("resolve 1");
        let second = resolve::<&str>(&build_catalog(&tasks), &[]).expect("resolve 2");
        prop_assert_eq!(first.as_slice(), second.as_slice());
    }

    /// Contract: assume-provided names never appear in the output.
    #[test]
    fn assume_provided_is_excluded(tasks in dag_strategy(1, 15)) {
        let mut builder = TaskCatalog::builder();
        for (name, deps) in &tasks {
            let deps = deps.iter().cloned().chain(std::iter::once("toolchain".to_string()));
            builder.register(name.clone(), deps).expect("unique names");
        }
        builder.assume_provided("toolchain");
        let catalog = builder.build();

        let order = resolve::<&str>(&catalog, &[]).expect("DAG should resolve");
        prop_assert!(!order.contains("toolchain"));
        prop_assert_eq!(order.len(), tasks.len());
    }
}
