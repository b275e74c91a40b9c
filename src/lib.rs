//! infotexts - translatable text documents backed by per-project stores
//!
//! This crate provides the core functionality for the `itx` CLI tool.
//!
//! # Architecture
//!
//! - [`document`] - XML tree, key derivation, key index, serialization
//! - [`validate`] - Root, language and display-name checks
//! - [`storage`] - SQLite entry store
//! - [`staging`] - Temporary store, working copy and atomic promotion
//! - [`sync`] - Ingestion into and rendering from the store
//! - [`translate`] - Translator trait, HTTP translator, orchestration
//! - [`session`] - Explicit session state sequencing the above
//! - [`config`] - Settings and project store discovery
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod language;
pub mod model;
pub mod session;
pub mod staging;
pub mod storage;
pub mod sync;
pub mod translate;
pub mod validate;

pub use error::{Error, Result};
pub use session::Session;
