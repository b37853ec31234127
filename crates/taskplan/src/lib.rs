// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]
// The CLI writes results to stdout and renders errors on stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

//! taskplan - build order planning for release pipelines
//!
//! The binary resolves requested tasks against a task catalog (the built-in
//! release catalog or a TOML file) and prints them one per line in an order
//! where every task follows its dependencies.
//!
//! The library half exposes the pieces the binary is made of so they can be
//! driven from tests:
//!
//! - [`cli`] - argument parsing, error categories and exit codes
//! - [`commands`] - catalog loading and command execution
//! - [`tracing`] - log subscriber setup

pub mod cli;
pub mod commands;
pub mod tracing;
