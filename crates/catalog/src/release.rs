//! The built-in cross-compilation release catalog.

use crate::{CatalogSpec, Result};
use taskplan_task_graph::TaskCatalog;

/// TOML source of the release pipeline catalog.
pub const RELEASE_CATALOG: &str = include_str!("release.toml");

/// Parse the built-in release pipeline specification.
///
/// # Errors
///
/// Only fails if the embedded document is malformed.
pub fn release_spec() -> Result<CatalogSpec> {
    CatalogSpec::from_toml_str(RELEASE_CATALOG, "<builtin>")
}

/// Build the release pipeline catalog: native and cross toolchains, the
/// third-party libraries for every target platform, and the compiler itself.
///
/// # Errors
///
/// Only fails if the embedded document is malformed.
pub fn release_catalog() -> Result<TaskCatalog> {
    release_spec()?.to_catalog()
}
