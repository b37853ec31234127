//! Task catalog and dependency resolution for taskplan.
//!
//! This crate turns a catalog of named tasks with declared dependencies into
//! a single build order in which every task follows all of its dependencies.
//!
//! # Key Types
//!
//! - [`TaskCatalog`]: immutable registry of tasks, built once via [`CatalogBuilder`]
//! - [`Resolver`] / [`resolve`]: depth-first expansion of requested roots into a [`BuildOrder`]
//! - [`DependencyGraph`]: petgraph view of the whole catalog for up-front validation
//!
//! # Example
//!
//! ```
//! use taskplan_task_graph::{TaskCatalog, resolve};
//!
//! let mut builder = TaskCatalog::builder();
//! builder.register("gmp", ["gcc-native-to-win32"])?;
//! builder.register("mpfr", ["gmp"])?;
//! builder.register("mpc", ["gmp", "mpfr"])?;
//! builder.assume_provided("gcc-native-to-win32");
//! let catalog = builder.build();
//!
//! let order = resolve(&catalog, &["mpc"])?;
//! assert_eq!(order.as_slice(), ["gmp", "mpfr", "mpc"]);
//! # Ok::<(), taskplan_task_graph::Error>(())
//! ```

mod catalog;
mod error;
mod graph;
mod resolver;
mod traversal;
mod validation;

pub use catalog::{CatalogBuilder, Task, TaskCatalog};
pub use error::{Error, Result};
pub use graph::{DependencyGraph, GraphNode};
pub use resolver::{Resolver, resolve};
pub use traversal::BuildOrder;
pub use validation::ValidationResult;
