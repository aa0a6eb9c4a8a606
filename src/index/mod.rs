pub mod document;
pub mod schema;
pub mod transaction;

use crate::config::IndexConfig;
use crate::error::Result;
use crate::query::autocomplete;
use crate::query::builder::{self, SearchRequest};
use crate::query::cursor::SearchCursor;
use crate::types::{Document, User};
use document::IndexRecord;
use schema::SchemaFields;
use tantivy::directory::MmapDirectory;
use tantivy::{Index as TantivyIndex, IndexWriter, ReloadPolicy, Searcher};
use transaction::IndexTransaction;

/// A handle on the on-disk document index.
///
/// Handles are cheap to open and intended to live for one operation or one
/// request; nothing in this crate holds a process-wide index singleton. The
/// engine serializes writers, so concurrent [`SearchIndex::with_writer`]
/// scopes from separate handles block on each other rather than interleave.
///
/// # Examples
///
/// ```rust,no_run
/// use docket::{IndexConfig, SearchIndex, SearchRequest};
///
/// # fn main() -> docket::Result<()> {
/// let config = IndexConfig::new("./index");
/// let index = SearchIndex::open(&config, false)?;
///
/// let request = SearchRequest {
///     query: "invoice tag:utility".to_string(),
///     ordering: Some("-created".to_string()),
///     user: None,
/// };
/// let mut results = index.search(&request, 25)?;
/// println!("{} matches", results.len()?);
/// # Ok(())
/// # }
/// ```
pub struct SearchIndex {
    inner: TantivyIndex,
    fields: SchemaFields,
    config: IndexConfig,
}

impl SearchIndex {
    /// Open the index at the configured location, creating it if needed.
    ///
    /// `recreate` wipes any existing index first. If opening fails for any
    /// other reason (corruption, schema drift), the failure is logged, the
    /// directory is deleted and recreated, and a fresh index is opened —
    /// only filesystem errors from that second attempt propagate.
    pub fn open(config: &IndexConfig, recreate: bool) -> Result<SearchIndex> {
        if recreate && config.index_dir.is_dir() {
            std::fs::remove_dir_all(&config.index_dir)?;
        }

        match Self::try_open(config) {
            Ok(index) => Ok(index),
            Err(e) => {
                tracing::error!(error = %e, "error while opening the index, recreating");
                if config.index_dir.is_dir() {
                    std::fs::remove_dir_all(&config.index_dir)?;
                }
                tracing::info!(dir = %config.index_dir.display(), "recreating empty index");
                Self::try_open(config)
            }
        }
    }

    fn try_open(config: &IndexConfig) -> Result<SearchIndex> {
        std::fs::create_dir_all(&config.index_dir)?;
        let parts = schema::canonical();
        let dir = MmapDirectory::open(&config.index_dir)?;
        let inner = TantivyIndex::open_or_create(dir, parts.schema.clone())?;
        Ok(SearchIndex {
            inner,
            fields: parts.fields,
            config: config.clone(),
        })
    }

    /// A read-only snapshot of the index as of this call. Safe to use while
    /// a writer is active; it simply won't see uncommitted changes.
    pub fn searcher(&self) -> Result<Searcher> {
        let reader = self
            .inner
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(reader.searcher())
    }

    fn writer(&self) -> Result<IndexWriter> {
        Ok(self.inner.writer(self.config.writer_memory_bytes)?)
    }

    /// Run index mutations inside a transaction scope.
    ///
    /// On `Ok` the buffered operations are committed and merge threads are
    /// awaited. On `Err` the failure is logged, everything since the last
    /// commit is rolled back, merge threads are still awaited, and the error
    /// is returned — the index is left exactly as it was.
    pub fn with_writer<T>(
        &self,
        op: impl FnOnce(&mut IndexTransaction) -> Result<T>,
    ) -> Result<T> {
        let mut txn = IndexTransaction::new(self.writer()?, self.fields);
        match op(&mut txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                tracing::error!(error = %e, "index write failed, rolling back");
                if let Err(rollback_err) = txn.rollback() {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Index a document that was created or updated in the source store.
    ///
    /// `viewers` is the set of users holding view permission, as computed by
    /// the permission collaborator. One transaction, committed on return.
    pub fn add_or_update_document(&self, doc: &Document, viewers: &[User]) -> Result<()> {
        let record = IndexRecord::project(doc, viewers);
        self.with_writer(|txn| txn.upsert(&record))
    }

    /// Remove a deleted source document from the index. One transaction,
    /// committed on return.
    pub fn remove_document_from_index(&self, doc: &Document) -> Result<()> {
        self.with_writer(|txn| {
            txn.delete_by_id(doc.id);
            Ok(())
        })
    }

    /// Garbage-collect obsolete segment files and block until any in-flight
    /// merge completes. Maintenance only; keep it off the request path.
    pub fn optimize(&self) -> Result<()> {
        let writer = self.writer()?;
        writer.garbage_collect_files().wait()?;
        writer.wait_merging_threads()?;
        Ok(())
    }

    /// Build a lazy result cursor for a full-text query.
    ///
    /// The query string is parsed now (malformed queries surface here as
    /// [`DocketError::QueryParse`](crate::DocketError::QueryParse)); no
    /// search executes until a slice is requested from the cursor.
    pub fn search(&self, request: &SearchRequest, page_size: usize) -> Result<SearchCursor> {
        let query = builder::build_query(
            &self.inner,
            &self.fields,
            request,
            self.config.enforce_permission_filter,
        )?;
        let sort = builder::resolve_ordering(request.ordering.as_deref());
        Ok(SearchCursor::new(
            self.searcher()?,
            query,
            sort,
            page_size,
            self.fields,
        ))
    }

    /// Rank autocomplete completions for `term` by how many indexed
    /// documents contain each candidate.
    pub fn autocomplete(
        &self,
        term: &str,
        limit: usize,
        user: Option<&User>,
    ) -> Result<Vec<String>> {
        autocomplete::suggest(self, term, limit, user)
    }

    pub(crate) fn tantivy(&self) -> &TantivyIndex {
        &self.inner
    }

    pub(crate) fn fields(&self) -> &SchemaFields {
        &self.fields
    }
}
