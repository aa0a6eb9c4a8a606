use crate::error::Result;
use crate::index::schema::{self, SchemaFields};
use crate::types::User;
use tantivy::query::{BooleanQuery, Query, QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::{Index as TantivyIndex, Term};

/// Parameters of one full-text query session.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Engine query grammar: bare terms, boolean operators, `field:term`
    /// scoping over the full-text searchable fields.
    pub query: String,
    /// Logical sort field, optionally prefixed with `-` for descending.
    /// Unknown names fall back to relevance ranking.
    pub ordering: Option<String>,
    /// Requesting user, consulted by the permission filter when enabled.
    pub user: Option<User>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum SortKey {
    /// Sorted through the named u64 fast-field column.
    Numeric(&'static str),
    /// Sorted by the stored value of the field.
    Text(Field),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

/// Parse the query string over the full-text searchable fields and, when
/// permission enforcement is on, restrict it to what the requesting user may
/// see. Parse failures surface as [`DocketError::QueryParse`]; they are never
/// downgraded to an empty result set.
///
/// [`DocketError::QueryParse`]: crate::DocketError::QueryParse
pub(crate) fn build_query(
    index: &TantivyIndex,
    fields: &SchemaFields,
    request: &SearchRequest,
    enforce_permissions: bool,
) -> Result<Box<dyn Query>> {
    let parser = QueryParser::for_index(
        index,
        vec![
            fields.content,
            fields.title,
            fields.correspondent,
            fields.tag,
            fields.doc_type,
            fields.notes,
            fields.custom_fields,
        ],
    );
    let parsed = parser.parse_query(&request.query)?;

    if !enforce_permissions {
        return Ok(parsed);
    }
    match permission_filter(request.user.as_ref(), fields) {
        Some(filter) => Ok(Box::new(BooleanQuery::intersection(vec![parsed, filter]))),
        None => Ok(parsed),
    }
}

/// The visibility filter for `user`: unowned documents, documents they own,
/// or documents listing them as a viewer. Superusers see everything (no
/// filter); anonymous requests see unowned documents only.
pub(crate) fn permission_filter(
    user: Option<&User>,
    fields: &SchemaFields,
) -> Option<Box<dyn Query>> {
    let unowned: Box<dyn Query> = Box::new(TermQuery::new(
        Term::from_field_bool(fields.has_owner, false),
        IndexRecordOption::Basic,
    ));
    match user {
        Some(u) if u.is_superuser => None,
        Some(u) => {
            let owned: Box<dyn Query> = Box::new(TermQuery::new(
                Term::from_field_u64(fields.owner_id, u.id),
                IndexRecordOption::Basic,
            ));
            let viewer: Box<dyn Query> = Box::new(TermQuery::new(
                Term::from_field_text(fields.viewer_id, &u.id.to_string()),
                IndexRecordOption::Basic,
            ));
            Some(Box::new(BooleanQuery::union(vec![unowned, owned, viewer])))
        }
        None => Some(unowned),
    }
}

/// Map a logical ordering name onto an index sort. Names outside the
/// allow-list mean "no explicit sort" (relevance ranking), never an error.
pub(crate) fn resolve_ordering(ordering: Option<&str>) -> Option<SortSpec> {
    let raw = ordering?;
    let (name, descending) = match raw.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (raw, false),
    };

    let fields = &schema::canonical().fields;
    let key = match name {
        "created" => SortKey::Numeric("created"),
        "modified" => SortKey::Numeric("modified"),
        "added" => SortKey::Numeric("added"),
        "archive_serial_number" => SortKey::Numeric("asn"),
        "num_notes" => SortKey::Numeric("num_notes"),
        "title" => SortKey::Text(fields.title),
        "correspondent__name" => SortKey::Text(fields.correspondent),
        "document_type__name" => SortKey::Text(fields.doc_type),
        "owner" => SortKey::Text(fields.owner),
        _ => return None,
    };
    Some(SortSpec { key, descending })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_prefix_is_stripped() {
        let spec = resolve_ordering(Some("-created")).unwrap();
        assert!(spec.descending);
        assert!(matches!(spec.key, SortKey::Numeric("created")));

        let spec = resolve_ordering(Some("created")).unwrap();
        assert!(!spec.descending);
    }

    #[test]
    fn relation_names_map_to_index_fields() {
        assert!(matches!(
            resolve_ordering(Some("archive_serial_number")).unwrap().key,
            SortKey::Numeric("asn")
        ));
        assert!(matches!(
            resolve_ordering(Some("correspondent__name")).unwrap().key,
            SortKey::Text(_)
        ));
        assert!(matches!(
            resolve_ordering(Some("document_type__name")).unwrap().key,
            SortKey::Text(_)
        ));
    }

    #[test]
    fn unknown_ordering_means_no_sort() {
        assert!(resolve_ordering(Some("bogus_field")).is_none());
        assert!(resolve_ordering(Some("-bogus_field")).is_none());
        assert!(resolve_ordering(None).is_none());
    }

    #[test]
    fn superuser_bypasses_permission_filter() {
        let fields = &schema::canonical().fields;
        let root = User {
            id: 1,
            username: "root".to_string(),
            is_superuser: true,
        };
        assert!(permission_filter(Some(&root), fields).is_none());
        assert!(permission_filter(None, fields).is_some());
    }
}
