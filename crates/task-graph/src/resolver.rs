//! Depth-first dependency resolution.
//!
//! The resolver expands requested roots into their transitive dependency
//! closure and emits each task only after all of its dependencies, which
//! makes the accumulated sequence a valid build order.
//!
//! Traversal uses an explicit frame stack rather than recursion, so deep
//! dependency chains cannot exhaust the call stack. The names of the frames
//! currently being expanded form the active path used for cycle detection;
//! it is an insertion-ordered set, so membership checks are constant time.

use crate::{BuildOrder, Result, Task, TaskCatalog};
use indexmap::IndexSet;
use tracing::{debug, instrument, trace};

/// Resolve `roots` against `catalog` into a build order.
///
/// With no roots every registered task is visited, in registration order.
/// Root order and declared dependency order decide which of the valid
/// orders is produced, so the same input always yields the same output.
///
/// # Errors
///
/// Returns [`Error::UnknownTask`](crate::Error::UnknownTask) if a root or a
/// dependency is neither registered nor assumed provided, and
/// [`Error::CircularDependency`](crate::Error::CircularDependency) if the
/// traversal reaches a task on its own ancestor path. No partial order is
/// returned in either case.
#[instrument(level = "debug", skip_all, fields(roots = roots.len()))]
pub fn resolve<S: AsRef<str>>(catalog: &TaskCatalog, roots: &[S]) -> Result<BuildOrder> {
    let mut resolver = Resolver::new(catalog);

    if roots.is_empty() {
        for name in catalog.names() {
            resolver.visit(name)?;
        }
        let order = resolver.finish();
        debug_assert_eq!(
            order.len(),
            catalog.buildable_count(),
            "full resolution must emit every buildable task exactly once"
        );
        return Ok(order);
    }

    for root in roots {
        resolver.visit(root.as_ref())?;
    }
    Ok(resolver.finish())
}

/// A task being expanded, with the index of its next dependency to visit.
struct Frame<'c> {
    task: &'c Task,
    next_dep: usize,
}

/// Resolution state for one request against a catalog.
///
/// Each resolver owns its state exclusively, so independent resolvers can
/// share one catalog across threads.
#[derive(Debug)]
pub struct Resolver<'c> {
    catalog: &'c TaskCatalog,
    completed: IndexSet<String>,
    active: IndexSet<String>,
}

impl<'c> Resolver<'c> {
    /// Create a resolver with empty state.
    #[must_use]
    pub fn new(catalog: &'c TaskCatalog) -> Self {
        Self {
            catalog,
            completed: IndexSet::new(),
            active: IndexSet::new(),
        }
    }

    /// Visit one root, appending it and its not-yet-emitted dependencies.
    ///
    /// On failure the active path is restored to what it was before the
    /// call; tasks completed before the failure stay completed.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn visit(&mut self, name: &str) -> Result<()> {
        let depth = self.active.len();
        let result = self.walk(name);
        if let Err(err) = &result {
            debug!(root = name, error = %err, "Resolution failed");
            self.active.truncate(depth);
        }
        result
    }

    /// Names emitted so far, in build order.
    pub fn completed(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(String::as_str)
    }

    /// The chain of tasks currently being expanded, outermost first.
    #[must_use]
    pub fn active_path(&self) -> Vec<&str> {
        self.active.iter().map(String::as_str).collect()
    }

    /// Consume the resolver into the accumulated build order.
    #[must_use]
    pub fn finish(self) -> BuildOrder {
        debug!(
            collected = self.completed.len(),
            total = self.catalog.len(),
            "Resolution finished"
        );
        BuildOrder::new(self.completed)
    }

    fn walk(&mut self, root: &str) -> Result<()> {
        let Some(task) = self.enter(root)? else {
            return Ok(());
        };
        let mut frames = vec![Frame { task, next_dep: 0 }];

        while let Some(frame) = frames.last_mut() {
            let task = frame.task;
            if let Some(dep) = task.dependencies().get(frame.next_dep) {
                frame.next_dep += 1;
                if self.completed.contains(dep.as_str()) {
                    continue;
                }
                if let Some(next) = self.enter(dep)? {
                    frames.push(Frame {
                        task: next,
                        next_dep: 0,
                    });
                }
            } else {
                frames.pop();
                self.complete(task);
            }
        }

        Ok(())
    }

    /// Decide whether `name` needs expanding, and if so push it on the
    /// active path and return its task.
    fn enter(&mut self, name: &str) -> Result<Option<&'c Task>> {
        if self.catalog.is_assumed_provided(name) {
            trace!(task = name, "Skipping assume-provided task");
            return Ok(None);
        }
        if self.completed.contains(name) {
            return Ok(None);
        }
        if self.active.contains(name) {
            return Err(crate::Error::circular(
                self.active.iter().cloned().collect(),
                name,
            ));
        }

        let task = self.catalog.lookup(name, &self.active)?;
        trace!(task = name, depth = self.active.len(), "Visiting task");
        self.active.insert(name.to_owned());
        Ok(Some(task))
    }

    fn complete(&mut self, task: &Task) {
        let popped = self.active.pop();
        debug_assert_eq!(popped.as_deref(), Some(task.name()));
        trace!(task = task.name(), position = self.completed.len(), "Task collected");
        self.completed.insert(task.name().to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::time::{Duration, Instant};

    fn catalog(tasks: &[(&str, &[&str])], provided: &[&str]) -> TaskCatalog {
        let mut builder = TaskCatalog::builder();
        for (name, deps) in tasks {
            builder.register(*name, deps.iter().copied()).unwrap();
        }
        for name in provided {
            builder.assume_provided(*name);
        }
        builder.build()
    }

    fn names(order: &BuildOrder) -> Vec<&str> {
        order.iter().collect()
    }

    #[test]
    fn test_shared_dependency_emitted_once() {
        let catalog = catalog(
            &[("a", &[]), ("b", &["a"]), ("c", &["a"]), ("d", &["b", "c"])],
            &[],
        );
        let order = resolve(&catalog, &["d"]).unwrap();
        assert_eq!(names(&order), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_declared_order_breaks_ties() {
        let catalog = catalog(
            &[("a", &[]), ("b", &["a"]), ("c", &["a"]), ("d", &["c", "b"])],
            &[],
        );
        let order = resolve(&catalog, &["d"]).unwrap();
        assert_eq!(names(&order), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_only_closure_of_roots_is_emitted() {
        let catalog = catalog(
            &[
                ("gmp", &[]),
                ("mpfr", &["gmp"]),
                ("zlib", &[]),
                ("libpng", &["zlib"]),
            ],
            &[],
        );
        let order = resolve(&catalog, &["mpfr"]).unwrap();
        assert_eq!(names(&order), vec!["gmp", "mpfr"]);
    }

    #[test]
    fn test_two_task_cycle() {
        let catalog = catalog(&[("a", &["b"]), ("b", &["a"])], &[]);
        let err = resolve(&catalog, &["a"]).unwrap_err();
        assert_eq!(
            err,
            Error::circular(vec!["a".to_string(), "b".to_string()], "a")
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let catalog = catalog(&[("a", &["a"])], &[]);
        let err = resolve(&catalog, &["a"]).unwrap_err();
        assert_eq!(err, Error::circular(vec!["a".to_string()], "a"));
    }

    #[test]
    fn test_cycle_below_acyclic_prefix() {
        let catalog = catalog(
            &[
                ("top", &["ok", "x"]),
                ("ok", &[]),
                ("x", &["y"]),
                ("y", &["z"]),
                ("z", &["x"]),
            ],
            &[],
        );
        let err = resolve(&catalog, &["top"]).unwrap_err();
        match err {
            Error::CircularDependency { path, task } => {
                assert_eq!(path, vec!["top", "x", "y", "z"]);
                assert_eq!(task, "x");
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_dependency() {
        let catalog = catalog(&[("a", &["b"])], &[]);
        let err = resolve(&catalog, &["a"]).unwrap_err();
        assert_eq!(err, Error::unknown("b", vec!["a".to_string()]));
    }

    #[test]
    fn test_unknown_root() {
        let catalog = catalog(&[("a", &[])], &[]);
        let err = resolve(&catalog, &["nope"]).unwrap_err();
        assert_eq!(err, Error::unknown("nope", vec![]));
    }

    #[test]
    fn test_assume_provided_is_never_looked_up() {
        let catalog = catalog(&[("x", &["native-toolchain"])], &["native-toolchain"]);
        let order = resolve(&catalog, &["x"]).unwrap();
        assert_eq!(names(&order), vec!["x"]);
    }

    #[test]
    fn test_assume_provided_root_emits_nothing() {
        let catalog = catalog(&[("x", &[])], &["gcc-native-to-native"]);
        let order = resolve(&catalog, &["gcc-native-to-native"]).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_registered_but_provided_task_is_skipped() {
        let catalog = catalog(&[("cc", &["missing"]), ("app", &["cc"])], &["cc"]);
        let order = resolve(&catalog, &["app"]).unwrap();
        assert_eq!(names(&order), vec!["app"]);

        let all = resolve::<&str>(&catalog, &[]).unwrap();
        assert_eq!(names(&all), vec!["app"]);
    }

    #[test]
    fn test_full_mode_follows_registration_order() {
        let catalog = catalog(
            &[("d", &["b", "c"]), ("c", &["a"]), ("b", &["a"]), ("a", &[])],
            &[],
        );
        let order = resolve::<&str>(&catalog, &[]).unwrap();
        assert_eq!(names(&order), vec!["a", "b", "c", "d"]);
        assert_eq!(order.len(), catalog.buildable_count());
    }

    #[test]
    fn test_redundant_root_changes_nothing() {
        let catalog = catalog(&[("a", &["b"]), ("b", &["c"]), ("c", &[])], &[]);
        let single = resolve(&catalog, &["a"]).unwrap();
        let both = resolve(&catalog, &["a", "b"]).unwrap();
        assert_eq!(single, both);
    }

    #[test]
    fn test_root_order_is_respected() {
        let catalog = catalog(&[("a", &[]), ("b", &[])], &[]);
        assert_eq!(names(&resolve(&catalog, &["b", "a"]).unwrap()), vec!["b", "a"]);
        assert_eq!(names(&resolve(&catalog, &["a", "b"]).unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn test_failed_visit_leaves_clean_active_path() {
        let catalog = catalog(
            &[("bad", &["inner"]), ("inner", &["ghost"]), ("good", &[])],
            &[],
        );
        let mut resolver = Resolver::new(&catalog);

        let err = resolver.visit("bad").unwrap_err();
        assert_eq!(
            err,
            Error::unknown("ghost", vec!["bad".to_string(), "inner".to_string()])
        );
        assert!(resolver.active_path().is_empty());

        resolver.visit("good").unwrap();
        assert!(resolver.active_path().is_empty());
        assert_eq!(resolver.completed().collect::<Vec<_>>(), vec!["good"]);
    }

    #[test]
    fn test_long_ring_reports_whole_path_in_order() {
        let n = 20_000;
        let mut builder = TaskCatalog::builder();
        for i in 0..n {
            builder
                .register(format!("ring_{i}"), [format!("ring_{}", (i + 1) % n)])
                .unwrap();
        }
        let catalog = builder.build();

        let start = Instant::now();
        let err = resolve(&catalog, &["ring_0"]).unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(5));
        match err {
            Error::CircularDependency { path, task } => {
                assert_eq!(path.len(), n);
                assert_eq!(path.first().map(String::as_str), Some("ring_0"));
                assert_eq!(path.last().map(String::as_str), Some("ring_19999"));
                assert_eq!(task, "ring_0");
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let start = Instant::now();
        let mut builder = TaskCatalog::builder();
        builder.register("task_0", Vec::<String>::new()).unwrap();
        for i in 1..50_000 {
            builder
                .register(format!("task_{i}"), [format!("task_{}", i - 1)])
                .unwrap();
        }
        let catalog = builder.build();

        let order = resolve(&catalog, &["task_49999"]).unwrap();
        assert_eq!(order.len(), 50_000);
        assert_eq!(order.position("task_0"), Some(0));
        assert_eq!(order.position("task_49999"), Some(49_999));
        // Cycle checks are constant time, so the walk stays linear in depth
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
