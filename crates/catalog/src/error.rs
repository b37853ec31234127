//! Error types for the catalog crate

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for loading and expanding catalog specifications
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The catalog file could not be read
    #[error("failed to read catalog {}", path.display())]
    #[diagnostic(
        code(taskplan::catalog::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path of the catalog file
        path: Box<Path>,
    },

    /// The catalog document is not valid TOML or does not match the schema
    #[error("invalid catalog {origin}: {message}")]
    #[diagnostic(code(taskplan::catalog::parse))]
    Parse {
        /// Where the document came from (a path or "<builtin>")
        origin: String,
        /// Parser message, including line and column
        message: String,
    },

    /// A task refers to a target group that is not declared
    #[error("task '{task}' uses unknown target group '{group}'")]
    #[diagnostic(
        code(taskplan::catalog::unknown_target_group),
        help("declare the group under [targets] or list the targets explicitly")
    )]
    UnknownTargetGroup {
        /// Task entry name
        task: String,
        /// The group that was not found
        group: String,
    },

    /// A task entry is inconsistent on its own
    #[error("invalid task entry '{task}': {message}")]
    #[diagnostic(code(taskplan::catalog::invalid_entry))]
    InvalidEntry {
        /// Task entry name
        task: String,
        /// What is wrong with it
        message: String,
    },

    /// Registration failed in the task catalog
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] taskplan_task_graph::Error),
}

impl Error {
    /// Create an I/O error with path context
    #[must_use]
    pub fn io(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::Io {
            source,
            path: path.as_ref().into(),
        }
    }

    /// Create a parse error
    #[must_use]
    pub fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Create an invalid entry error
    #[must_use]
    pub fn invalid_entry(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            task: task.into(),
            message: message.into(),
        }
    }
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;
