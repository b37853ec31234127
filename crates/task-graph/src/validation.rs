//! Validation utilities for task catalogs.

use crate::{DependencyGraph, Error, TaskCatalog};

/// Result of catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the catalog is valid (no cycles, no missing dependencies).
    pub is_valid: bool,
    /// List of validation errors, if any.
    pub errors: Vec<Error>,
}

impl ValidationResult {
    /// Create a valid result.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
        }
    }

    /// Create an invalid result with errors.
    #[must_use]
    pub fn invalid(errors: Vec<Error>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

impl DependencyGraph {
    /// Validate the graph structure.
    ///
    /// Checks for:
    /// - Dependencies on tasks that are neither registered nor assumed provided
    /// - Cycles, reported once per strongly connected component
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        if !self.missing_dependencies().is_empty() {
            errors.push(Error::MissingDependencies {
                missing: self.missing_dependencies().to_vec(),
            });
        }

        for members in self.cycles() {
            errors.push(Error::CycleDetected { members });
        }

        if errors.is_empty() {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(errors)
        }
    }
}

impl TaskCatalog {
    /// Validate every task in the catalog at once.
    ///
    /// A catalog that validates cleanly resolves in full mode without error.
    #[must_use]
    pub fn validate(&self) -> ValidationResult {
        DependencyGraph::from_catalog(self).validate()
    }
}
