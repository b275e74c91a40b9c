//! Document ⇄ store synchronization.
//!
//! This module moves text between infotexts documents and the entry store:
//!
//! - **Ingest**: document → store (insert new keys, update changed text,
//!   never delete)
//! - **Render**: store → document (write entry text back into the tree)
//! - **File**: atomic writes for stores and rendered documents
//!
//! # Example
//!
//! ```ignore
//! use itx::sync::{ingest, render};
//!
//! let stats = ingest(&mut storage, project_id, &doc, lang)?;
//! let bytes = render(&storage, project_id, &doc, Some(target))?;
//! ```

pub mod file;
mod ingest;
mod render;

pub use file::atomic_write;
pub use ingest::{ingest, stale_entries, IngestStats};
pub use render::{render, render_document, RenderStats};
