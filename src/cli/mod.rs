//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init` |
//! | Match | Match lifecycle and views | `match new`, `match start`, `match show`, `match undo` |
//! | Score | One scoring event per call | `score <id> runs 4`, `score <id> wicket caught` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output, or set `SCOREBOOK_LOG`
//! to a tracing filter such as `scorebook=trace`:
//! ```bash
//! scorebook --verbose score m-1a2b3c4 runs 4
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod match_cmd;
mod output;
mod render;
mod score;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
