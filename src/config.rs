use crate::error::{DocketError, Result};
use std::path::PathBuf;

/// Where the index lives and how writes behave.
///
/// The index directory is configuration, not a process-wide global: every
/// [`SearchIndex::open`](crate::SearchIndex::open) call takes a config, so
/// callers control the open/close lifecycle per operation or per request.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Directory holding the on-disk index. Created on first open.
    pub index_dir: PathBuf,
    /// Indexing buffer handed to the Tantivy writer, in bytes.
    pub writer_memory_bytes: usize,
    /// Apply the per-user permission filter to full-text queries.
    ///
    /// Off by default: the reference behavior ships with the filter built but
    /// not applied, and turning it on is a product decision.
    pub enforce_permission_filter: bool,
}

impl IndexConfig {
    pub const DEFAULT_WRITER_MEMORY: usize = 20_000_000;

    pub fn new(index_dir: impl Into<PathBuf>) -> Self {
        IndexConfig {
            index_dir: index_dir.into(),
            writer_memory_bytes: Self::DEFAULT_WRITER_MEMORY,
            enforce_permission_filter: false,
        }
    }

    /// Read configuration from `DOCKET_INDEX_DIR`, `DOCKET_WRITER_MEMORY_MB`
    /// and `DOCKET_ENFORCE_PERMISSIONS`.
    pub fn from_env() -> Result<Self> {
        let dir = std::env::var("DOCKET_INDEX_DIR")
            .map_err(|_| DocketError::Config("DOCKET_INDEX_DIR is not set".to_string()))?;
        let mut config = IndexConfig::new(dir);

        if let Ok(mb) = std::env::var("DOCKET_WRITER_MEMORY_MB") {
            let mb: usize = mb.parse().map_err(|_| {
                DocketError::Config(format!("invalid DOCKET_WRITER_MEMORY_MB: {mb}"))
            })?;
            config.writer_memory_bytes = mb * 1_000_000;
        }

        if let Ok(v) = std::env::var("DOCKET_ENFORCE_PERMISSIONS") {
            config.enforce_permission_filter = matches!(v.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }
}
