pub mod dto;
pub mod memory;
pub mod postgrest;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{StudyInput, StudyRecord};

pub use memory::InMemoryTable;
pub use postgrest::PostgrestTable;

pub const DEFAULT_TABLE: &str = "study-record";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to remote store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote store returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("failed to decode remote response: {0}")]
    Decode(String),

    #[error("invalid remote store url: {0}")]
    InvalidUrl(String),
}

#[derive(Clone, Debug)]
pub struct PostgrestConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub timeout: Option<Duration>,
}

/// The remote table holding study records.
///
/// Rows are addressed by `id` only; a filter that matches nothing is a no-op
/// on the remote side and is not reported as an error.
#[async_trait]
pub trait RecordTable: Send + Sync {
    async fn select_all(&self) -> Result<Vec<StudyRecord>, RemoteError>;
    async fn insert(&self, input: &StudyInput) -> Result<(), RemoteError>;
    async fn update(&self, id: &str, input: &StudyInput) -> Result<(), RemoteError>;
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;
}
