#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use docket::{
    CustomField, CustomFieldInstance, CustomFieldValue, Document, IndexConfig, SearchIndex,
    SearchRequest, Tag, User,
};
use std::sync::Once;
use tempfile::TempDir;

static TRACING: Once = Once::new();

/// Honor `RUST_LOG` in test runs.
fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

pub struct Fixture {
    pub _tmp: TempDir,
    pub config: IndexConfig,
    pub index: SearchIndex,
}

pub fn open_index() -> Fixture {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let config = IndexConfig::new(tmp.path().join("index"));
    let index = SearchIndex::open(&config, false).unwrap();
    Fixture {
        _tmp: tmp,
        config,
        index,
    }
}

/// A document whose body always contains the token "archive", so tests can
/// match the whole fixture set with one query.
pub fn doc(id: u64, title: &str, content: &str) -> Document {
    let base = 1_700_000_000 + id as i64;
    Document {
        id,
        title: title.to_string(),
        content: format!("archive {content}"),
        checksum: format!("checksum-{id}"),
        original_filename: Some(format!("doc-{id}.pdf")),
        archive_serial_number: None,
        created: Utc.timestamp_opt(base, 0).unwrap(),
        modified: Utc.timestamp_opt(base + 10, 0).unwrap(),
        added: Utc.timestamp_opt(base + 20, 0).unwrap(),
        correspondent: None,
        document_type: None,
        storage_path: None,
        owner: None,
        tags: vec![],
        notes: vec![],
        custom_fields: vec![],
    }
}

pub fn user(id: u64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        is_superuser: false,
    }
}

pub fn superuser(id: u64) -> User {
    User {
        id,
        username: "admin".to_string(),
        is_superuser: true,
    }
}

pub fn tag(id: u64, name: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
    }
}

pub fn custom_field(id: u64, name: &str, value: CustomFieldValue) -> CustomFieldInstance {
    CustomFieldInstance {
        field: CustomField {
            id,
            name: name.to_string(),
        },
        value,
    }
}

pub fn request(query: &str) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        ordering: None,
        user: None,
    }
}

pub fn ordered_request(query: &str, ordering: &str) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        ordering: Some(ordering.to_string()),
        user: None,
    }
}

/// Doc ids of every hit for `request`, in result order.
pub fn hit_ids(index: &SearchIndex, request: &SearchRequest) -> Vec<u64> {
    let mut cursor = index.search(request, 100).unwrap();
    let total = cursor.len().unwrap();
    cursor
        .get_slice(0, total.max(1))
        .unwrap()
        .iter()
        .map(|r| r.doc_id)
        .collect()
}
