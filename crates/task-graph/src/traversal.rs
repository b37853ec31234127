//! The ordered result of a resolution.

/// Task names in build order: every task comes after all of its
/// dependencies, and no name appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOrder {
    tasks: Vec<String>,
}

impl BuildOrder {
    pub(crate) fn new(tasks: impl IntoIterator<Item = String>) -> Self {
        Self {
            tasks: tasks.into_iter().collect(),
        }
    }

    /// Number of tasks in the order.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if the order is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Check if a task is part of the order.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Index of a task in the order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task == name)
    }

    /// The ordered names as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.tasks
    }

    /// Iterate over names in build order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(String::as_str)
    }

    /// Consume the order into a plain vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.tasks
    }
}

impl IntoIterator for BuildOrder {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

impl<'a> IntoIterator for &'a BuildOrder {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
