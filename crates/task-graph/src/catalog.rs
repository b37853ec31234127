//! The task catalog: a read-only registry of named tasks.
//!
//! A catalog is populated once through a [`CatalogBuilder`] and is immutable
//! afterwards. Dependency names are not checked at registration time; they
//! only have to exist by the time a resolution runs.

use crate::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

/// One unit of work in the build pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,
    dependencies: Vec<String>,
}

impl Task {
    /// Name of the task.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dependency names in declared order.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

/// Immutable registry of tasks plus the set of names that are assumed to be
/// provided from outside the pipeline.
#[derive(Debug, Clone, Default)]
pub struct TaskCatalog {
    tasks: IndexMap<String, Task>,
    assume_provided: IndexSet<String>,
}

impl TaskCatalog {
    /// Start building a new catalog.
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Get a task by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Look up a task that a resolution needs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTask`] carrying `requested_by` when no task
    /// with this name is registered.
    pub fn lookup<I, S>(&self, name: &str, requested_by: I) -> Result<&Task>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks.get(name).ok_or_else(|| {
            Error::unknown(name, requested_by.into_iter().map(Into::into).collect())
        })
    }

    /// Check if a task with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Check if a name is satisfied from outside the pipeline.
    #[must_use]
    pub fn is_assumed_provided(&self, name: &str) -> bool {
        self.assume_provided.contains(name)
    }

    /// Names treated as externally satisfied, in the order they were added.
    pub fn assumed_provided(&self) -> impl Iterator<Item = &str> {
        self.assume_provided.iter().map(String::as_str)
    }

    /// Number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if no tasks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of registered tasks a full resolution would emit.
    #[must_use]
    pub fn buildable_count(&self) -> usize {
        self.tasks
            .keys()
            .filter(|name| !self.assume_provided.contains(name.as_str()))
            .count()
    }

    /// Iterate over tasks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Iterate over task names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Turn the catalog back into a builder, e.g. to extend the
    /// assume-provided set from the command line.
    #[must_use]
    pub fn into_builder(self) -> CatalogBuilder {
        CatalogBuilder { catalog: self }
    }
}

impl<'a> IntoIterator for &'a TaskCatalog {
    type Item = &'a Task;
    type IntoIter = indexmap::map::Values<'a, String, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.values()
    }
}

/// Single-owner population phase for a [`TaskCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: TaskCatalog,
}

impl CatalogBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task with its dependencies in declared order.
    ///
    /// The dependency list is copied into the task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTask`] if the name is already registered.
    pub fn register<I, S>(&mut self, name: impl Into<String>, dependencies: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if self.catalog.tasks.contains_key(&name) {
            return Err(Error::duplicate(name));
        }

        let dependencies: Vec<String> = dependencies.into_iter().map(Into::into).collect();
        trace!(task = %name, deps = ?dependencies, "Registering task");
        self.catalog.tasks.insert(
            name.clone(),
            Task {
                name,
                dependencies,
            },
        );
        Ok(self)
    }

    /// Mark a name as satisfied from outside the pipeline.
    pub fn assume_provided(&mut self, name: impl Into<String>) -> &mut Self {
        self.catalog.assume_provided.insert(name.into());
        self
    }

    /// Check if a task with this name has been registered so far.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.catalog.contains(name)
    }

    /// Number of tasks registered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Check if nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Finish population and freeze the catalog.
    #[must_use]
    pub fn build(self) -> TaskCatalog {
        debug!(
            tasks = self.catalog.len(),
            assume_provided = self.catalog.assume_provided.len(),
            "Task catalog built"
        );
        self.catalog
    }
}
