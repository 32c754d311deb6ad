//! # Storage Layer
//!
//! Persistence for scorebook with git-friendly file formats.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Matches | JSONL, one versioned record per line | `.scorebook/matches/{id}.jsonl` |
//! | Config | TOML | `.scorebook/config.toml` |
//! | Rosters | TOML or JSON | anywhere, passed to `match new` |
//!
//! ## Concurrency Safety
//!
//! - [`MatchStore`] locks each match file (`fs2`) for every read and write
//! - Saves carry the version they were derived from; a stale version is
//!   refused with [`StoreError::ConcurrentModification`]
//! - Records are only appended, never rewritten
//!
//! ## Project Structure
//!
//! ```text
//! .scorebook/
//! ├── matches/
//! │   └── m-1a2b3c4.jsonl   # Version history for one match
//! └── config.toml           # Project configuration
//! ```
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a scorebook workspace
//! - [`MatchStore`] - Read/write versioned match records
//! - [`Config`] - Project and global configuration

mod config;
mod jsonl;
mod project;
mod roster_file;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, ScorerConfig, WORKSPACE_DIR};
pub use jsonl::{MatchRecord, MatchStore, SaveMeta, StoreError};
pub use project::{Project, ProjectError};
pub use roster_file::load_roster;
