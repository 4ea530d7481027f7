//! `facer_core` is the core library for the `facer` source generator. It
//! parses an ordered, typed feature list from an interface description and
//! regenerates derived source artifacts by replacing marked regions of
//! existing files, without disturbing hand-written surrounding content and
//! without writing files whose content has not changed.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Interface description (.iface)
//!   → Lexer (tokenizes records, joins continuation lines)
//!   → Face (ordered feature model + alias table)
//!   → Emitters (messages, enumerations, constants, declarations, definitions)
//!   → Patcher (replaces marked regions, suppresses no-op writes)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `facer.toml`: the interface
//!   path and the list of patch targets with their comment leaders.
//! - [`emit`] — The artifact emitters, each a pure function of the model.
//! - [`types`] — Type mapping and identifier casing: [`TypeMap`],
//!   [`pascal_case`], [`strip_known_prefix`].
//!
//! ## Key Types
//!
//! - [`Face`] — The parsed interface model: ordered features, name lookup,
//!   alias table.
//! - [`Feature`] — One entry of the description with its typed slots.
//! - [`WriteOutcome`] — Whether a patch actually wrote the file.
//! - [`RunReport`] / [`CheckReport`] — Accumulated per-target results of a
//!   full run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use facer_core::FacerConfig;
//! use facer_core::check_targets;
//! use facer_core::regenerate_all;
//!
//! let root = Path::new(".");
//! let config = FacerConfig::load(root).unwrap();
//!
//! // Report stale targets without writing
//! let check = check_targets(root, &config).unwrap();
//! if !check.is_ok() {
//! 	eprintln!("{} stale target(s) found", check.stale.len());
//! }
//!
//! // Regenerate in place; unchanged files are not rewritten
//! let report = regenerate_all(root, &config).unwrap();
//! for path in &report.changed {
//! 	println!("Changed {}", path.display());
//! }
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use face::*;
pub use patcher::*;
pub use types::*;

pub mod config;
pub mod emit;
mod engine;
mod error;
mod face;
pub(crate) mod lexer;
mod patcher;
pub mod types;

#[cfg(test)]
mod __fixtures;
#[cfg(test)]
mod __tests;
