use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lowest Archive Serial Number accepted by the projector.
pub const ASN_MIN: i64 = 0;
/// Highest Archive Serial Number accepted by the projector.
pub const ASN_MAX: i64 = u32::MAX as i64;

/// A user of the surrounding application. Only the pieces the index cares
/// about: identity, display name for the `owner` field, and the superuser
/// flag that bypasses permission filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correspondent {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoragePath {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub note: String,
}

/// A custom field definition attached to zero or more documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomField {
    pub id: u64,
    pub name: String,
}

/// A typed value held by a [`CustomFieldInstance`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomFieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl std::fmt::Display for CustomFieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomFieldValue::Text(s) => write!(f, "{s}"),
            CustomFieldValue::Integer(i) => write!(f, "{i}"),
            CustomFieldValue::Float(v) => write!(f, "{v}"),
            CustomFieldValue::Boolean(b) => write!(f, "{b}"),
            CustomFieldValue::Date(d) => write!(f, "{d}"),
        }
    }
}

/// One custom field value on one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldInstance {
    pub field: CustomField,
    pub value: CustomFieldValue,
}

impl std::fmt::Display for CustomFieldInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.name, self.value)
    }
}

/// A document record as held by the source-of-truth store, with its related
/// collections denormalized onto the struct. The index only ever reads these.
///
/// The viewer set (users with view permission) is not part of the record; the
/// permission collaborator supplies it at projection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub checksum: String,
    pub original_filename: Option<String>,
    pub archive_serial_number: Option<i64>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub added: DateTime<Utc>,
    pub correspondent: Option<Correspondent>,
    pub document_type: Option<DocumentType>,
    pub storage_path: Option<StoragePath>,
    pub owner: Option<User>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldInstance>,
}
