use crate::error::Result;
use crate::index::document::IndexRecord;
use crate::index::schema::SchemaFields;
use crate::query::builder::{SortKey, SortSpec};
use std::cmp::Ordering;
use std::collections::HashMap;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::Query;
use tantivy::schema::{Field, Value};
use tantivy::{DocAddress, DocId, Searcher, SegmentReader, TantivyDocument};

/// Upper bound on how many hits a stored-value (text) sort will examine.
/// Far beyond realistic archive sizes; logged if ever exceeded.
const TEXT_SORT_SCAN_LIMIT: usize = 100_000;

/// Lazily evaluated, paginated search results.
///
/// Nothing is executed until [`len`](SearchCursor::len) or
/// [`get_slice`](SearchCursor::get_slice) is first called; each page is
/// fetched with an offset/limit search against the snapshot searcher and
/// cached by its start offset, so repeated access to the same page within a
/// session returns identical results without re-querying. The cursor is a
/// per-request object and is not meant to outlive it.
#[derive(Debug)]
pub struct SearchCursor {
    searcher: Searcher,
    query: Box<dyn Query>,
    sort: Option<SortSpec>,
    page_size: usize,
    fields: SchemaFields,
    pages: HashMap<usize, Vec<IndexRecord>>,
    total: Option<usize>,
}

impl SearchCursor {
    pub(crate) fn new(
        searcher: Searcher,
        query: Box<dyn Query>,
        sort: Option<SortSpec>,
        page_size: usize,
        fields: SchemaFields,
    ) -> SearchCursor {
        SearchCursor {
            searcher,
            query,
            sort,
            page_size: page_size.max(1),
            fields,
            pages: HashMap::new(),
            total: None,
        }
    }

    /// Total number of matching documents. Reuses the first-page fetch, so a
    /// later `get_slice(0, ..)` is a cache hit.
    pub fn len(&mut self) -> Result<usize> {
        if self.total.is_none() {
            self.fetch_page(0)?;
        }
        Ok(self.total.unwrap_or(0))
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Records `start .. start + len`, capped at the page size.
    ///
    /// The page starting at `start` is fetched on first access and cached;
    /// callers paginating with `start` multiples of the page size see every
    /// hit exactly once.
    pub fn get_slice(&mut self, start: usize, len: usize) -> Result<Vec<IndexRecord>> {
        self.fetch_page(start)?;
        let page = &self.pages[&start];
        Ok(page.iter().take(len).cloned().collect())
    }

    fn fetch_page(&mut self, start: usize) -> Result<()> {
        if self.pages.contains_key(&start) {
            return Ok(());
        }

        let hits = match self.sort {
            None => self.by_relevance(start)?,
            Some(SortSpec { key: SortKey::Numeric(name), descending }) => {
                self.by_fast_field(name, descending, start)?
            }
            Some(SortSpec { key: SortKey::Text(field), descending }) => {
                self.by_stored_value(field, descending, start)?
            }
        };

        let mut records = Vec::with_capacity(hits.len());
        for addr in hits {
            let doc: TantivyDocument = self.searcher.doc(addr)?;
            records.push(IndexRecord::from_stored(&doc, &self.fields)?);
        }
        self.pages.insert(start, records);
        Ok(())
    }

    fn by_relevance(&mut self, start: usize) -> Result<Vec<DocAddress>> {
        let collector = TopDocs::with_limit(self.page_size).and_offset(start);
        let (total, top) = self
            .searcher
            .search(self.query.as_ref(), &(Count, collector))?;
        self.total = Some(total);
        Ok(top.into_iter().map(|(_, addr)| addr).collect())
    }

    /// Sort through a u64 fast-field column. Ascending order inverts the
    /// value so the engine's descending top-k applies either way; documents
    /// without a value sort last in both directions.
    fn by_fast_field(
        &mut self,
        field_name: &'static str,
        descending: bool,
        start: usize,
    ) -> Result<Vec<DocAddress>> {
        let collector = TopDocs::with_limit(start + self.page_size).custom_score(
            move |segment_reader: &SegmentReader| {
                let col = segment_reader.fast_fields().u64(field_name).ok();
                let missing = if descending { 0 } else { u64::MAX };
                move |doc: DocId| -> u64 {
                    let value = col.as_ref().and_then(|c| c.first(doc)).unwrap_or(missing);
                    if descending {
                        value
                    } else {
                        u64::MAX - value
                    }
                }
            },
        );

        let (total, top) = self
            .searcher
            .search(self.query.as_ref(), &(Count, collector))?;
        self.total = Some(total);

        let skip = start.min(top.len());
        Ok(top.into_iter().skip(skip).map(|(_, addr)| addr).collect())
    }

    /// Sort by a stored text value: fetch the matches, order them in memory.
    /// Text sort fields carry no fast column, and archives are small enough
    /// that this stays cheap.
    fn by_stored_value(
        &mut self,
        field: Field,
        descending: bool,
        start: usize,
    ) -> Result<Vec<DocAddress>> {
        let collector = TopDocs::with_limit(TEXT_SORT_SCAN_LIMIT);
        let (total, prelim) = self
            .searcher
            .search(self.query.as_ref(), &(Count, collector))?;
        self.total = Some(total);
        if total > TEXT_SORT_SCAN_LIMIT {
            tracing::warn!(total, "text sort truncated to {TEXT_SORT_SCAN_LIMIT} hits");
        }

        let mut keyed: Vec<(Option<String>, DocAddress)> = Vec::with_capacity(prelim.len());
        for (_, addr) in prelim {
            let doc: TantivyDocument = self.searcher.doc(addr)?;
            let key = doc
                .get_first(field)
                .and_then(|v| v.as_str())
                .map(str::to_string);
            keyed.push((key, addr));
        }

        // missing values last in both directions
        keyed.sort_by(|a, b| match (&a.0, &b.0) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                if descending {
                    y.cmp(x)
                } else {
                    x.cmp(y)
                }
            }
        });

        let from = start.min(keyed.len());
        let to = (start + self.page_size).min(keyed.len());
        Ok(keyed[from..to].iter().map(|(_, addr)| *addr).collect())
    }
}
