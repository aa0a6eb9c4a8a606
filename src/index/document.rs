use crate::error::{DocketError, Result};
use crate::index::schema::SchemaFields;
use crate::types::{Document, User, ASN_MAX, ASN_MIN};
use serde::{Deserialize, Serialize};
use tantivy::schema::Value;
use tantivy::TantivyDocument;

/// The flat field-value record stored in the index, one per source document.
///
/// Everything that can be absent in the source domain is an `Option`; an
/// absent value is omitted from the engine document entirely rather than
/// written as a placeholder, so "has no correspondent" stays queryable
/// through the `has_*` flags without null handling in the query language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    pub doc_id: u64,
    pub title: String,
    /// Indexed but never stored; records read back from the index carry an
    /// empty string here.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    pub asn: Option<u64>,
    pub correspondent: Option<String>,
    pub correspondent_id: Option<u64>,
    pub has_correspondent: bool,
    pub tag: Option<String>,
    pub tag_id: Option<String>,
    pub has_tag: bool,
    pub document_type: Option<String>,
    pub document_type_id: Option<i64>,
    pub has_type: bool,
    pub created: u64,
    pub modified: u64,
    pub added: u64,
    pub path: Option<String>,
    pub path_id: Option<u64>,
    pub has_path: bool,
    pub notes: Option<String>,
    pub num_notes: u64,
    pub custom_fields: Option<String>,
    pub custom_field_count: u64,
    pub has_custom_fields: bool,
    pub custom_fields_id: Option<String>,
    pub owner: Option<String>,
    pub owner_id: Option<u64>,
    pub has_owner: bool,
    pub viewer_id: Option<String>,
    pub is_shared: bool,
    pub checksum: String,
    pub original_filename: Option<String>,
}

fn join<I, T: ToString>(items: I) -> Option<String>
where
    I: IntoIterator<Item = T>,
{
    let joined = items
        .into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn epoch_secs(ts: chrono::DateTime<chrono::Utc>) -> u64 {
    ts.timestamp().max(0) as u64
}

impl IndexRecord {
    /// Project a source document (plus the viewer set computed by the
    /// permission collaborator) into its indexed form.
    ///
    /// An Archive Serial Number outside `[ASN_MIN, ASN_MAX]` is logged as an
    /// error and indexed as `0`; indexing still proceeds.
    pub fn project(doc: &Document, viewers: &[User]) -> IndexRecord {
        let tag = join(doc.tags.iter().map(|t| t.name.as_str()));
        let tag_id = join(doc.tags.iter().map(|t| t.id));
        let notes = join(doc.notes.iter().map(|n| n.note.as_str()));
        let custom_fields = join(doc.custom_fields.iter());
        let custom_fields_id = join(doc.custom_fields.iter().map(|c| c.field.id));
        let viewer_id = join(viewers.iter().map(|u| u.id));

        let asn = doc.archive_serial_number.map(|asn| {
            if !(ASN_MIN..=ASN_MAX).contains(&asn) {
                tracing::error!(
                    doc_id = doc.id,
                    asn,
                    "not indexing Archive Serial Number: out of range [{ASN_MIN}, {ASN_MAX}]"
                );
                0
            } else {
                asn as u64
            }
        });

        IndexRecord {
            doc_id: doc.id,
            title: doc.title.clone(),
            content: doc.content.clone(),
            asn,
            correspondent: doc.correspondent.as_ref().map(|c| c.name.clone()),
            correspondent_id: doc.correspondent.as_ref().map(|c| c.id),
            has_correspondent: doc.correspondent.is_some(),
            has_tag: tag.is_some(),
            tag,
            tag_id,
            document_type: doc.document_type.as_ref().map(|t| t.name.clone()),
            document_type_id: doc.document_type.as_ref().map(|t| t.id),
            has_type: doc.document_type.is_some(),
            created: epoch_secs(doc.created),
            modified: epoch_secs(doc.modified),
            added: epoch_secs(doc.added),
            path: doc.storage_path.as_ref().map(|p| p.name.clone()),
            path_id: doc.storage_path.as_ref().map(|p| p.id),
            has_path: doc.storage_path.is_some(),
            notes,
            num_notes: doc.notes.len() as u64,
            has_custom_fields: custom_fields.is_some(),
            custom_fields,
            custom_field_count: doc.custom_fields.len() as u64,
            custom_fields_id,
            owner: doc.owner.as_ref().map(|u| u.username.clone()),
            owner_id: doc.owner.as_ref().map(|u| u.id),
            has_owner: doc.owner.is_some(),
            is_shared: !viewers.is_empty(),
            viewer_id,
            checksum: doc.checksum.clone(),
            original_filename: doc.original_filename.clone(),
        }
    }

    /// Convert to an engine document. Only present values are written.
    pub(crate) fn to_tantivy(&self, fields: &SchemaFields) -> TantivyDocument {
        let mut doc = TantivyDocument::new();
        doc.add_u64(fields.doc_id, self.doc_id);
        doc.add_text(fields.title, &self.title);
        doc.add_text(fields.content, &self.content);
        doc.add_text(fields.content_exact, &self.content);
        if let Some(asn) = self.asn {
            doc.add_u64(fields.asn, asn);
        }
        if let Some(ref v) = self.correspondent {
            doc.add_text(fields.correspondent, v);
        }
        if let Some(v) = self.correspondent_id {
            doc.add_u64(fields.correspondent_id, v);
        }
        doc.add_bool(fields.has_correspondent, self.has_correspondent);
        if let Some(ref v) = self.tag {
            doc.add_text(fields.tag, v);
        }
        if let Some(ref v) = self.tag_id {
            doc.add_text(fields.tag_id, v);
        }
        doc.add_bool(fields.has_tag, self.has_tag);
        if let Some(ref v) = self.document_type {
            doc.add_text(fields.doc_type, v);
        }
        if let Some(v) = self.document_type_id {
            doc.add_i64(fields.type_id, v);
        }
        doc.add_bool(fields.has_type, self.has_type);
        doc.add_u64(fields.created, self.created);
        doc.add_u64(fields.modified, self.modified);
        doc.add_u64(fields.added, self.added);
        if let Some(ref v) = self.path {
            doc.add_text(fields.path, v);
        }
        if let Some(v) = self.path_id {
            doc.add_u64(fields.path_id, v);
        }
        doc.add_bool(fields.has_path, self.has_path);
        if let Some(ref v) = self.notes {
            doc.add_text(fields.notes, v);
        }
        doc.add_u64(fields.num_notes, self.num_notes);
        if let Some(ref v) = self.custom_fields {
            doc.add_text(fields.custom_fields, v);
        }
        doc.add_u64(fields.custom_field_count, self.custom_field_count);
        doc.add_bool(fields.has_custom_fields, self.has_custom_fields);
        if let Some(ref v) = self.custom_fields_id {
            doc.add_text(fields.custom_fields_id, v);
        }
        if let Some(ref v) = self.owner {
            doc.add_text(fields.owner, v);
        }
        if let Some(v) = self.owner_id {
            doc.add_u64(fields.owner_id, v);
        }
        doc.add_bool(fields.has_owner, self.has_owner);
        if let Some(ref v) = self.viewer_id {
            doc.add_text(fields.viewer_id, v);
        }
        doc.add_bool(fields.is_shared, self.is_shared);
        doc.add_text(fields.checksum, &self.checksum);
        if let Some(ref v) = self.original_filename {
            doc.add_text(fields.original_filename, v);
        }
        doc
    }

    /// Rebuild a record from the stored fields of a search hit.
    pub(crate) fn from_stored(doc: &TantivyDocument, fields: &SchemaFields) -> Result<IndexRecord> {
        let text = |field| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        let u64_of = |field| doc.get_first(field).and_then(|v| v.as_u64());
        let bool_of = |field| {
            doc.get_first(field)
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
        };

        let doc_id = u64_of(fields.doc_id)
            .ok_or_else(|| DocketError::InvalidDocument("stored record has no doc_id".into()))?;

        Ok(IndexRecord {
            doc_id,
            title: text(fields.title).unwrap_or_default(),
            content: String::new(),
            asn: u64_of(fields.asn),
            correspondent: text(fields.correspondent),
            correspondent_id: u64_of(fields.correspondent_id),
            has_correspondent: bool_of(fields.has_correspondent),
            tag: text(fields.tag),
            tag_id: text(fields.tag_id),
            has_tag: bool_of(fields.has_tag),
            document_type: text(fields.doc_type),
            document_type_id: doc.get_first(fields.type_id).and_then(|v| v.as_i64()),
            has_type: bool_of(fields.has_type),
            created: u64_of(fields.created).unwrap_or(0),
            modified: u64_of(fields.modified).unwrap_or(0),
            added: u64_of(fields.added).unwrap_or(0),
            path: text(fields.path),
            path_id: u64_of(fields.path_id),
            has_path: bool_of(fields.has_path),
            notes: text(fields.notes),
            num_notes: u64_of(fields.num_notes).unwrap_or(0),
            custom_fields: text(fields.custom_fields),
            custom_field_count: u64_of(fields.custom_field_count).unwrap_or(0),
            has_custom_fields: bool_of(fields.has_custom_fields),
            custom_fields_id: text(fields.custom_fields_id),
            owner: text(fields.owner),
            owner_id: u64_of(fields.owner_id),
            has_owner: bool_of(fields.has_owner),
            viewer_id: text(fields.viewer_id),
            is_shared: bool_of(fields.is_shared),
            checksum: text(fields.checksum).unwrap_or_default(),
            original_filename: text(fields.original_filename),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;
    use chrono::TimeZone;

    fn base_doc() -> Document {
        Document {
            id: 7,
            title: "Electric invoice".to_string(),
            content: "monthly electric invoice".to_string(),
            checksum: "abc123".to_string(),
            original_filename: Some("invoice.pdf".to_string()),
            archive_serial_number: None,
            created: chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            modified: chrono::Utc.timestamp_opt(1_700_000_100, 0).unwrap(),
            added: chrono::Utc.timestamp_opt(1_700_000_200, 0).unwrap(),
            correspondent: None,
            document_type: None,
            storage_path: None,
            owner: None,
            tags: vec![],
            notes: vec![],
            custom_fields: vec![],
        }
    }

    #[test]
    fn absent_relations_are_omitted() {
        let record = IndexRecord::project(&base_doc(), &[]);
        assert!(!record.has_correspondent);
        assert!(record.correspondent.is_none());
        assert!(record.correspondent_id.is_none());
        assert!(!record.has_tag);
        assert!(record.tag.is_none());
        assert!(!record.is_shared);
        assert!(record.viewer_id.is_none());
    }

    #[test]
    fn multi_valued_fields_are_comma_joined() {
        let mut doc = base_doc();
        doc.tags = vec![
            Tag { id: 3, name: "utility".to_string() },
            Tag { id: 9, name: "2024".to_string() },
        ];
        doc.notes = vec![
            Note { id: 1, note: "paid".to_string() },
            Note { id: 2, note: "disputed".to_string() },
        ];
        doc.custom_fields = vec![CustomFieldInstance {
            field: CustomField { id: 4, name: "amount".to_string() },
            value: CustomFieldValue::Float(12.5),
        }];

        let record = IndexRecord::project(&doc, &[]);
        assert_eq!(record.tag.as_deref(), Some("utility,2024"));
        assert_eq!(record.tag_id.as_deref(), Some("3,9"));
        assert_eq!(record.notes.as_deref(), Some("paid,disputed"));
        assert_eq!(record.num_notes, 2);
        assert_eq!(record.custom_fields.as_deref(), Some("amount: 12.5"));
        assert_eq!(record.custom_fields_id.as_deref(), Some("4"));
        assert_eq!(record.custom_field_count, 1);
        assert!(record.has_custom_fields);
    }

    #[test]
    fn asn_out_of_range_becomes_zero() {
        let mut doc = base_doc();
        doc.archive_serial_number = Some(ASN_MAX + 1);
        assert_eq!(IndexRecord::project(&doc, &[]).asn, Some(0));

        doc.archive_serial_number = Some(ASN_MIN - 1);
        assert_eq!(IndexRecord::project(&doc, &[]).asn, Some(0));

        doc.archive_serial_number = Some(ASN_MAX);
        assert_eq!(IndexRecord::project(&doc, &[]).asn, Some(ASN_MAX as u64));

        doc.archive_serial_number = Some(ASN_MIN);
        assert_eq!(IndexRecord::project(&doc, &[]).asn, Some(0));
    }

    #[test]
    fn viewer_set_drives_sharing_flags() {
        let viewers = vec![
            User { id: 11, username: "alice".to_string(), is_superuser: false },
            User { id: 12, username: "bob".to_string(), is_superuser: false },
        ];
        let record = IndexRecord::project(&base_doc(), &viewers);
        assert_eq!(record.viewer_id.as_deref(), Some("11,12"));
        assert!(record.is_shared);
    }
}
