use std::sync::OnceLock;
use tantivy::schema::{
    Field, IndexRecordOption, Schema, SchemaBuilder, TextFieldIndexing, TextOptions, FAST, INDEXED,
    STORED, STRING, TEXT,
};

/// Stemming tokenizer used for the free-text fields. Registered by default in
/// every Tantivy index.
const STEM_TOKENIZER: &str = "en_stem";

/// Handles for every field in the canonical schema, captured at build time so
/// the rest of the crate never does a fallible name lookup.
#[derive(Debug, Clone, Copy)]
pub struct SchemaFields {
    pub doc_id: Field,
    pub title: Field,
    pub content: Field,
    pub content_exact: Field,
    pub asn: Field,
    pub correspondent: Field,
    pub correspondent_id: Field,
    pub has_correspondent: Field,
    pub tag: Field,
    pub tag_id: Field,
    pub has_tag: Field,
    pub doc_type: Field,
    pub type_id: Field,
    pub has_type: Field,
    pub created: Field,
    pub modified: Field,
    pub added: Field,
    pub path: Field,
    pub path_id: Field,
    pub has_path: Field,
    pub notes: Field,
    pub num_notes: Field,
    pub custom_fields: Field,
    pub custom_field_count: Field,
    pub has_custom_fields: Field,
    pub custom_fields_id: Field,
    pub owner: Field,
    pub owner_id: Field,
    pub has_owner: Field,
    pub viewer_id: Field,
    pub is_shared: Field,
    pub checksum: Field,
    pub original_filename: Field,
}

pub struct SchemaParts {
    pub schema: Schema,
    pub fields: SchemaFields,
}

static CANONICAL: OnceLock<SchemaParts> = OnceLock::new();

/// The canonical index schema, built once per process and reused for every
/// open call. The schema is immutable once an index has been created against
/// it; changing it means rebuilding the index from scratch.
pub fn canonical() -> &'static SchemaParts {
    CANONICAL.get_or_init(build)
}

fn stemmed(stored: bool) -> TextOptions {
    let indexing = TextFieldIndexing::default()
        .set_tokenizer(STEM_TOKENIZER)
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let opts = TextOptions::default().set_indexing_options(indexing);
    if stored {
        opts.set_stored()
    } else {
        opts
    }
}

fn build() -> SchemaParts {
    let mut builder: SchemaBuilder = Schema::builder();

    let doc_id = builder.add_u64_field("doc_id", INDEXED | STORED | FAST);
    let title = builder.add_text_field("title", stemmed(true));
    let content = builder.add_text_field("content", stemmed(false));
    // The body indexed a second time without stemming. Autocomplete draws its
    // candidate terms from here so suggestions are surface forms, not stems.
    let content_exact = builder.add_text_field(
        "content_exact",
        TextOptions::default().set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer("default")
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        ),
    );
    let asn = builder.add_u64_field("asn", INDEXED | STORED | FAST);
    let correspondent = builder.add_text_field("correspondent", TEXT | STORED);
    let correspondent_id = builder.add_u64_field("correspondent_id", INDEXED | STORED);
    let has_correspondent = builder.add_bool_field("has_correspondent", INDEXED | STORED);
    let tag = builder.add_text_field("tag", TEXT | STORED);
    // Comma-joined id lists go in as text; the default tokenizer splits them
    // so a single id is directly queryable.
    let tag_id = builder.add_text_field("tag_id", TEXT | STORED);
    let has_tag = builder.add_bool_field("has_tag", INDEXED | STORED);
    let doc_type = builder.add_text_field("type", TEXT | STORED);
    let type_id = builder.add_i64_field("type_id", INDEXED | STORED);
    let has_type = builder.add_bool_field("has_type", INDEXED | STORED);
    let created = builder.add_u64_field("created", INDEXED | STORED | FAST);
    let modified = builder.add_u64_field("modified", INDEXED | STORED | FAST);
    let added = builder.add_u64_field("added", INDEXED | STORED | FAST);
    let path = builder.add_text_field("path", TEXT | STORED);
    let path_id = builder.add_u64_field("path_id", INDEXED | STORED);
    let has_path = builder.add_bool_field("has_path", INDEXED | STORED);
    let notes = builder.add_text_field("notes", stemmed(true));
    let num_notes = builder.add_u64_field("num_notes", INDEXED | STORED | FAST);
    let custom_fields = builder.add_text_field("custom_fields", TEXT | STORED);
    let custom_field_count = builder.add_u64_field("custom_field_count", INDEXED | STORED);
    let has_custom_fields = builder.add_bool_field("has_custom_fields", INDEXED | STORED);
    let custom_fields_id = builder.add_text_field("custom_fields_id", TEXT | STORED);
    let owner = builder.add_text_field("owner", TEXT | STORED);
    let owner_id = builder.add_u64_field("owner_id", INDEXED | STORED);
    let has_owner = builder.add_bool_field("has_owner", INDEXED | STORED);
    let viewer_id = builder.add_text_field("viewer_id", TEXT | STORED);
    let is_shared = builder.add_bool_field("is_shared", INDEXED | STORED);
    let checksum = builder.add_text_field("checksum", STRING | STORED);
    let original_filename = builder.add_text_field("original_filename", TEXT | STORED);

    let schema = builder.build();
    let fields = SchemaFields {
        doc_id,
        title,
        content,
        content_exact,
        asn,
        correspondent,
        correspondent_id,
        has_correspondent,
        tag,
        tag_id,
        has_tag,
        doc_type,
        type_id,
        has_type,
        created,
        modified,
        added,
        path,
        path_id,
        has_path,
        notes,
        num_notes,
        custom_fields,
        custom_field_count,
        has_custom_fields,
        custom_fields_id,
        owner,
        owner_id,
        has_owner,
        viewer_id,
        is_shared,
        checksum,
        original_filename,
    };

    SchemaParts { schema, fields }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_is_reused() {
        let a = canonical() as *const SchemaParts;
        let b = canonical() as *const SchemaParts;
        assert_eq!(a, b);
    }

    #[test]
    fn field_names_resolve() {
        let parts = canonical();
        assert_eq!(parts.schema.get_field("doc_id").unwrap(), parts.fields.doc_id);
        assert_eq!(parts.schema.get_field("type").unwrap(), parts.fields.doc_type);
        assert_eq!(
            parts.schema.get_field("content_exact").unwrap(),
            parts.fields.content_exact
        );
    }
}
