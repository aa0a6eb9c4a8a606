use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DocketError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Tantivy error: {0}")]
    Tantivy(String),

    #[error("Query parse error: {0}")]
    QueryParse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, DocketError>;

impl From<std::io::Error> for DocketError {
    fn from(e: std::io::Error) -> Self {
        DocketError::Io(e.to_string())
    }
}

impl From<tantivy::TantivyError> for DocketError {
    fn from(e: tantivy::TantivyError) -> Self {
        DocketError::Tantivy(e.to_string())
    }
}

impl From<tantivy::query::QueryParserError> for DocketError {
    fn from(e: tantivy::query::QueryParserError) -> Self {
        DocketError::QueryParse(e.to_string())
    }
}

impl From<tantivy::directory::error::OpenDirectoryError> for DocketError {
    fn from(e: tantivy::directory::error::OpenDirectoryError) -> Self {
        DocketError::Tantivy(e.to_string())
    }
}
