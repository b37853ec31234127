//! Per-platform multiplication of task definitions.
//!
//! Most release tasks are the same piece of work built once per target
//! platform. A [`MultiTarget`] describes such a task once and expands it
//! into one registration per target.

use crate::Result;
use taskplan_task_graph::CatalogBuilder;
use tracing::trace;

/// Placeholder replaced by the target name in templated names and dependencies.
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// A task definition multiplied across target platforms.
///
/// Two naming modes exist:
///
/// - **Suffix mode** (the name has no placeholder): `zlib` becomes
///   `zlib-win32`, `zlib-dos`, ... and every dependency gets the same suffix.
///   The per-target implicit dependencies from [`MultiTarget::target_depends`]
///   come first.
/// - **Template mode** (the name contains `{target}`): the placeholder is
///   substituted in the name and in every dependency; dependencies without
///   it are kept as written and no implicit dependencies are added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiTarget {
    name: String,
    depends: Vec<String>,
    targets: Vec<String>,
    exclude: Vec<String>,
    target_depends: Vec<String>,
}

impl MultiTarget {
    /// Start a definition for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Dependencies, given without target suffix.
    #[must_use]
    pub fn depends<I, S>(mut self, depends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends = depends.into_iter().map(Into::into).collect();
        self
    }

    /// Targets to build for, in order.
    #[must_use]
    pub fn targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Targets to skip.
    #[must_use]
    pub fn exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    /// Implicit dependencies added to every suffix-mode task, usually the
    /// cross compiler for the target (`gcc-native-to-{target}`).
    #[must_use]
    pub fn target_depends<I, S>(mut self, target_depends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_depends = target_depends.into_iter().map(Into::into).collect();
        self
    }

    /// Check if the name is a `{target}` template.
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.name.contains(TARGET_PLACEHOLDER)
    }

    /// The (name, dependencies) pairs this definition expands to, in target order.
    #[must_use]
    pub fn expand(&self) -> Vec<(String, Vec<String>)> {
        self.targets
            .iter()
            .filter(|target| !self.exclude.contains(target))
            .map(|target| self.expand_one(target))
            .collect()
    }

    fn expand_one(&self, target: &str) -> (String, Vec<String>) {
        let substitute = |text: &str| text.replace(TARGET_PLACEHOLDER, target);

        if self.is_template() {
            let deps = self.depends.iter().map(|dep| substitute(dep)).collect();
            return (substitute(&self.name), deps);
        }

        let deps = self
            .target_depends
            .iter()
            .map(|dep| substitute(dep))
            .chain(self.depends.iter().map(|dep| format!("{dep}-{target}")))
            .collect();
        (format!("{}-{target}", self.name), deps)
    }

    /// Register every expanded task, returning how many were added.
    ///
    /// # Errors
    ///
    /// Fails with a duplicate task error if an expanded name is already registered.
    pub fn register(&self, builder: &mut CatalogBuilder) -> Result<usize> {
        let expanded = self.expand();
        let count = expanded.len();
        for (name, deps) in expanded {
            trace!(task = %self.name, expanded = %name, "Registering target variant");
            builder.register(name, deps)?;
        }
        Ok(count)
    }
}
