//! Data models for infotexts.
//!
//! - Project
//! - Entry

pub mod entry;
pub mod project;

pub use entry::{Entry, Upsert};
pub use project::Project;
