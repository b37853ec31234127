//! Error types for catalog construction and dependency resolution.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Result type for task graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a catalog or resolving a build order.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum Error {
    /// A task name was registered twice.
    #[error("duplicate task '{name}'")]
    #[diagnostic(
        code(taskplan::graph::duplicate_task),
        help("every task in a catalog must have a unique name")
    )]
    DuplicateTask {
        /// The name that was registered more than once.
        name: String,
    },

    /// A root or dependency names a task that is not in the catalog.
    #[error("unknown task '{name}'{}", render_requesters(requested_by))]
    #[diagnostic(
        code(taskplan::graph::unknown_task),
        help("check the task name, or mark it as assume-provided if it is built elsewhere")
    )]
    UnknownTask {
        /// The name that could not be found.
        name: String,
        /// Chain of tasks that led to the lookup, outermost first.
        requested_by: Vec<String>,
    },

    /// The traversal came back to a task on its own ancestor path.
    #[error("circular dependency: {}", render_cycle(path, task))]
    #[diagnostic(
        code(taskplan::graph::circular_dependency),
        help("remove one of the dependency edges along this chain")
    )]
    CircularDependency {
        /// The active traversal path when the cycle was found, outermost first.
        path: Vec<String>,
        /// The task that was reached a second time.
        task: String,
    },

    /// Whole-catalog validation found dependencies that do not exist.
    #[error("missing dependencies: {}", render_missing(missing))]
    #[diagnostic(code(taskplan::graph::missing_dependencies))]
    MissingDependencies {
        /// List of (task, missing dependency) pairs.
        missing: Vec<(String, String)>,
    },

    /// Whole-catalog validation found a dependency cycle.
    #[error("cycle detected between tasks: {}", members.join(", "))]
    #[diagnostic(code(taskplan::graph::cycle_detected))]
    CycleDetected {
        /// Tasks that make up one strongly connected component.
        members: Vec<String>,
    },
}

impl Error {
    /// Create a duplicate task error
    #[must_use]
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateTask { name: name.into() }
    }

    /// Create an unknown task error
    #[must_use]
    pub fn unknown(name: impl Into<String>, requested_by: Vec<String>) -> Self {
        Self::UnknownTask {
            name: name.into(),
            requested_by,
        }
    }

    /// Create a circular dependency error
    #[must_use]
    pub fn circular(path: Vec<String>, task: impl Into<String>) -> Self {
        Self::CircularDependency {
            path,
            task: task.into(),
        }
    }

    /// The task name this error is about, if it concerns a single task.
    #[must_use]
    pub fn task_name(&self) -> Option<&str> {
        match self {
            Self::DuplicateTask { name } | Self::UnknownTask { name, .. } => Some(name),
            Self::CircularDependency { task, .. } => Some(task),
            Self::MissingDependencies { .. } | Self::CycleDetected { .. } => None,
        }
    }
}

fn render_requesters(requested_by: &[String]) -> String {
    if requested_by.is_empty() {
        String::new()
    } else {
        format!(", wanted by {}", requested_by.join(" -> "))
    }
}

fn render_cycle(path: &[String], task: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(task))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn render_missing(missing: &[(String, String)]) -> String {
    missing
        .iter()
        .map(|(task, dep)| format!("'{task}' depends on missing task '{dep}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_root_has_no_requesters() {
        let err = Error::unknown("fbc-dos", vec![]);
        assert_eq!(err.to_string(), "unknown task 'fbc-dos'");
    }

    #[test]
    fn test_unknown_dependency_lists_chain() {
        let err = Error::unknown(
            "zlib-dos",
            vec!["fbc-dos".to_string(), "libzip-dos".to_string()],
        );
        assert_eq!(
            err.to_string(),
            "unknown task 'zlib-dos', wanted by fbc-dos -> libzip-dos"
        );
        assert_eq!(err.task_name(), Some("zlib-dos"));
    }

    #[test]
    fn test_cycle_closes_the_chain() {
        let err = Error::circular(vec!["a".to_string(), "b".to_string()], "a");
        assert_eq!(err.to_string(), "circular dependency: a -> b -> a");
    }

    #[test]
    fn test_missing_dependencies_message() {
        let err = Error::MissingDependencies {
            missing: vec![("mpc-win32".to_string(), "gmp-win32".to_string())],
        };
        assert!(err.to_string().contains("'mpc-win32' depends on missing task 'gmp-win32'"));
        assert_eq!(err.task_name(), None);
    }
}
