use crate::error::Result;
use crate::index::document::IndexRecord;
use crate::index::schema::SchemaFields;
use tantivy::{IndexWriter, Term};

/// A scoped unit of index mutation.
///
/// Obtained through [`SearchIndex::with_writer`](crate::SearchIndex::with_writer),
/// which guarantees finalization on every exit path: commit on success,
/// rollback on failure, and in both cases a wait for the merge threads the
/// operation may have kicked off.
pub struct IndexTransaction {
    writer: IndexWriter,
    fields: SchemaFields,
}

impl IndexTransaction {
    pub(crate) fn new(writer: IndexWriter, fields: SchemaFields) -> Self {
        IndexTransaction { writer, fields }
    }

    /// Add or replace the record for its `doc_id`.
    ///
    /// Deletes any existing entry first, so re-indexing an unchanged document
    /// never produces duplicates.
    pub fn upsert(&mut self, record: &IndexRecord) -> Result<()> {
        self.delete_by_id(record.doc_id);
        self.writer.add_document(record.to_tantivy(&self.fields))?;
        Ok(())
    }

    /// Buffer a delete of every entry keyed by `doc_id`.
    pub fn delete_by_id(&mut self, doc_id: u64) {
        self.writer
            .delete_term(Term::from_field_u64(self.fields.doc_id, doc_id));
    }

    /// Merge threads are awaited even when the commit itself fails, so the
    /// writer is always fully released before the error propagates.
    pub(crate) fn commit(self) -> Result<()> {
        let IndexTransaction { mut writer, .. } = self;
        let committed = writer.commit();
        let waited = writer.wait_merging_threads();
        committed?;
        waited?;
        Ok(())
    }

    pub(crate) fn rollback(self) -> Result<()> {
        let IndexTransaction { mut writer, .. } = self;
        let rolled_back = writer.rollback();
        let waited = writer.wait_merging_threads();
        rolled_back?;
        waited?;
        Ok(())
    }
}
