//! Core building blocks for the release engine
//!
//! - **config**: shipway configuration (shipway.toml) parsing and validation
//! - **error**: error taxonomy with exit codes and contextual help messages
//! - **outcome**: structured run outcome and pipeline output emission
//! - **vcs**: git operations abstraction (SystemGit)

pub mod config;
pub mod error;
pub mod outcome;
pub mod vcs;
