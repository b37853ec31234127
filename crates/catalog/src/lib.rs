//! Declarative task catalogs for taskplan.
//!
//! This crate turns catalog specifications into registrations on a
//! [`taskplan_task_graph::CatalogBuilder`]:
//! - [`CatalogSpec`]: TOML documents listing tasks, target groups and
//!   assume-provided names
//! - [`MultiTarget`]: one task definition multiplied across target platforms
//! - [`release_catalog`]: the built-in cross-compilation release pipeline

mod error;
mod multitarget;
mod release;
mod spec;

pub use error::{Error, Result};
pub use multitarget::{MultiTarget, TARGET_PLACEHOLDER};
pub use release::{RELEASE_CATALOG, release_catalog, release_spec};
pub use spec::{CatalogSpec, TargetSelection, TaskSpec};
