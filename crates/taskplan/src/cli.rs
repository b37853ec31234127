use crate::tracing::{Level, LogLevel, TracingConfig, TracingFormat};
use clap::{Parser, ValueEnum};
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI, catalog or validation error exit code
pub const EXIT_CLI: i32 = 2;
/// Unknown task or circular dependency exit code
pub const EXIT_RESOLVE: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// Catalog or configuration error (exit code 2)
    #[error("{message}")]
    #[diagnostic(code(taskplan::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Resolution error (exit code 3)
    #[error("{message}")]
    #[diagnostic(code(taskplan::cli::resolve))]
    Resolve {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 3)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(taskplan::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new resolution error
    #[must_use]
    pub fn resolve(message: impl Into<String>) -> Self {
        Self::Resolve {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    /// Add help text to an existing error, returning a new error with the help text set.
    #[must_use]
    pub fn with_help(self, help_text: impl Into<String>) -> Self {
        let help = Some(help_text.into());
        match self {
            Self::Config { message, .. } => Self::Config { message, help },
            Self::Resolve { message, .. } => Self::Resolve { message, help },
            Self::Other { message, .. } => Self::Other { message, help },
        }
    }

    /// Short machine-readable category used in the JSON error envelope.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Resolve { .. } => "resolve",
            Self::Other { .. } => "other",
        }
    }

    fn with_help_from(self, diagnostic: &dyn Diagnostic) -> Self {
        match diagnostic.help() {
            Some(help) => self.with_help(help.to_string()),
            None => self,
        }
    }
}

/// Convert resolver errors into CLI categories.
///
/// Duplicate names and whole-catalog validation failures are defects in the
/// catalog (exit code 2); unknown tasks and cycles fail the resolution
/// (exit code 3).
impl From<taskplan_task_graph::Error> for CliError {
    fn from(err: taskplan_task_graph::Error) -> Self {
        use taskplan_task_graph::Error as GraphError;

        let converted = match &err {
            GraphError::DuplicateTask { .. }
            | GraphError::MissingDependencies { .. }
            | GraphError::CycleDetected { .. } => Self::config(err.to_string()),
            GraphError::UnknownTask { .. } | GraphError::CircularDependency { .. } => {
                Self::resolve(err.to_string())
            }
        };
        converted.with_help_from(&err)
    }
}

impl From<taskplan_catalog::Error> for CliError {
    fn from(err: taskplan_catalog::Error) -> Self {
        match err {
            taskplan_catalog::Error::Graph(inner) => inner.into(),
            taskplan_catalog::Error::Io { ref source, .. } => {
                let message = format!("{err}: {source}");
                Self::config(message).with_help_from(&err)
            }
            other => Self::config(other.to_string()).with_help_from(&other),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::other(format!("failed to write output: {err}"))
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Resolve { .. } | CliError::Other { .. } => EXIT_RESOLVE,
    }
}

/// Render error appropriately based on JSON flag
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": err.kind(),
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
    }
}

/// Output format for command results
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// One task name per line
    Text,
    /// JSON envelope
    Json,
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Print the order in which release pipeline tasks must be built.
///
/// With no task names the whole catalog is resolved.
#[derive(Parser, Debug)]
#[command(name = "taskplan")]
#[command(about = "Print a dependency-respecting build order for release pipeline tasks")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Tasks to build; all tasks when empty.
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// TOML catalog to use instead of the built-in release catalog.
    #[arg(short = 'c', long, env = "TASKPLAN_CATALOG", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Additional names that are provided outside the pipeline.
    #[arg(short = 'a', long = "assume-provided", value_name = "NAME")]
    pub assume_provided: Vec<String>,

    /// Output format for the build order.
    #[arg(short = 'o', long, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Validate the whole catalog instead of resolving.
    #[arg(long, conflicts_with_all = ["tasks", "list"])]
    pub check: bool,

    /// List catalog tasks in registration order.
    #[arg(long, conflicts_with = "tasks")]
    pub list: bool,

    /// Suppress the collected-count diagnostic.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Format of log lines on stderr.
    #[arg(long, default_value = "compact", value_enum)]
    pub log_format: TracingFormat,

    /// Emit log lines as JSON, same as `--log-format json`.
    #[arg(long, help = "Emit log lines as JSON")]
    pub json: bool,
}

impl Cli {
    /// Logging setup requested on the command line.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            format: if self.json {
                TracingFormat::Json
            } else {
                self.log_format
            },
            level: Level::from(self.level),
        }
    }
}
