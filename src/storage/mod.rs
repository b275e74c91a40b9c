//! SQLite storage layer for infotexts.
//!
//! This module provides the persistence layer using SQLite with:
//! - Rollback journal so each store is one self-contained file
//! - Transaction discipline for atomic writes
//! - A store-level dirty flag cleared only by promotion
//! - Online backup for working copies and promotion
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod schema;
pub mod sqlite;

pub use sqlite::{
    BackupProgress, LanguageCount, MutationContext, NewEntry, ProjectCounts, SqliteStorage,
};
