//! TOML catalog specification.
//!
//! A specification lists tasks in the order they are registered, the
//! target groups used to multiply them, and the names that are assumed to be
//! provided from outside the pipeline.

use crate::{Error, MultiTarget, Result, TARGET_PLACEHOLDER};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use taskplan_task_graph::{CatalogBuilder, TaskCatalog};
use tracing::{debug, info};

/// A whole catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSpec {
    /// Names satisfied outside the pipeline.
    #[serde(default)]
    pub assume_provided: Vec<String>,
    /// Implicit dependencies of every suffix-mode task, with `{target}` placeholders.
    #[serde(default)]
    pub target_depends: Vec<String>,
    /// Named target groups.
    #[serde(default)]
    pub targets: IndexMap<String, Vec<String>>,
    /// Task entries in registration order.
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskSpec>,
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    /// Task name, or a `{target}` template.
    pub name: String,
    /// Dependencies in declared order.
    #[serde(default)]
    pub depends: Vec<String>,
    /// Targets to multiply this entry over.
    #[serde(default)]
    pub targets: Option<TargetSelection>,
    /// Targets to leave out.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Targets of a task entry: a group name or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TargetSelection {
    /// A group declared under `[targets]`.
    Group(String),
    /// Target names given inline.
    List(Vec<String>),
}

impl CatalogSpec {
    /// Parse a specification from TOML text.
    ///
    /// `origin` names the document in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the text is not valid TOML or does not
    /// match the catalog schema.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::parse(origin, e.to_string()))
    }

    /// Read and parse a specification file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Parse`]
    /// if its contents are invalid.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
        let spec = Self::from_toml_str(&text, &path.display().to_string())?;
        info!(
            path = %path.display(),
            entries = spec.tasks.len(),
            "Loaded catalog specification"
        );
        Ok(spec)
    }

    /// Targets an entry expands to, or `None` for a single task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTargetGroup`] if the entry names an undeclared group.
    pub fn targets_for(&self, task: &TaskSpec) -> Result<Option<Vec<String>>> {
        match &task.targets {
            None => Ok(None),
            Some(TargetSelection::List(targets)) => Ok(Some(targets.clone())),
            Some(TargetSelection::Group(group)) => self
                .targets
                .get(group)
                .cloned()
                .map(Some)
                .ok_or_else(|| Error::UnknownTargetGroup {
                    task: task.name.clone(),
                    group: group.clone(),
                }),
        }
    }

    /// Register every entry into `builder`, in document order.
    ///
    /// # Errors
    ///
    /// Fails on entries that are inconsistent, on unknown target groups, and
    /// on duplicate task names after expansion.
    pub fn register_into(&self, builder: &mut CatalogBuilder) -> Result<()> {
        for name in &self.assume_provided {
            builder.assume_provided(name.clone());
        }

        for task in &self.tasks {
            let Some(targets) = self.targets_for(task)? else {
                if !task.exclude.is_empty() {
                    return Err(Error::invalid_entry(
                        &task.name,
                        "`exclude` requires `targets`",
                    ));
                }
                if task.name.contains(TARGET_PLACEHOLDER) {
                    return Err(Error::invalid_entry(
                        &task.name,
                        "a `{target}` name requires `targets`",
                    ));
                }
                builder.register(task.name.clone(), task.depends.iter().cloned())?;
                continue;
            };

            MultiTarget::new(task.name.clone())
                .depends(task.depends.iter().cloned())
                .targets(targets)
                .exclude(task.exclude.iter().cloned())
                .target_depends(self.target_depends.iter().cloned())
                .register(builder)?;
        }

        Ok(())
    }

    /// Build a catalog containing exactly this specification.
    ///
    /// # Errors
    ///
    /// See [`CatalogSpec::register_into`].
    pub fn to_catalog(&self) -> Result<TaskCatalog> {
        let mut builder = TaskCatalog::builder();
        self.register_into(&mut builder)?;
        let catalog = builder.build();
        debug!(
            entries = self.tasks.len(),
            tasks = catalog.len(),
            "Expanded catalog specification"
        );
        Ok(catalog)
    }
}
