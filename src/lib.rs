//! # Docket
//!
//! A schema-defined search index for document archives, built on
//! [Tantivy](https://github.com/quickwit-oss/tantivy).
//!
//! Docket keeps a derived inverted index consistent with an external
//! source-of-truth document store: documents (text, structured metadata,
//! per-document view permissions) are projected into a fixed schema, written
//! under a commit-on-success / rollback-on-failure transaction protocol, and
//! queried through lazy paginated cursors with field sorting and ranked
//! autocomplete.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use docket::{IndexConfig, SearchIndex, SearchRequest};
//!
//! # fn main() -> docket::Result<()> {
//! let config = IndexConfig::new("./index");
//! let index = SearchIndex::open(&config, false)?;
//!
//! // Write path: one transaction per mutation, committed before returning.
//! # let doc: docket::Document = unimplemented!();
//! index.add_or_update_document(&doc, &[])?;
//!
//! // Read path: nothing executes until a slice is requested.
//! let request = SearchRequest {
//!     query: "invoice tag:utility".to_string(),
//!     ordering: Some("-created".to_string()),
//!     user: None,
//! };
//! let mut results = index.search(&request, 25)?;
//! let first_page = results.get_slice(0, 25)?;
//! println!("{} of {} hits", first_page.len(), results.len()?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod query;
pub mod types;

pub use config::IndexConfig;
pub use error::{DocketError, Result};
pub use index::document::IndexRecord;
pub use index::transaction::IndexTransaction;
pub use index::SearchIndex;
pub use query::{SearchCursor, SearchRequest};
pub use types::*;
