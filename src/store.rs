//! Record list state and the bridge to the remote table.
//!
//! Every mutation is followed by a full re-fetch; the store never patches its
//! list locally, so it is at most one round trip behind the remote table.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info};

use crate::models::{StudyInput, StudyRecord};
use crate::remote::{RecordTable, RemoteError};

pub const REMOVAL_PROMPT: &str = "Sure?";

/// What subscribers see: the loaded list plus the initial-load flag.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub records: Vec<StudyRecord>,
    pub loading: bool,
}

impl StoreSnapshot {
    /// Sum of `time` across the loaded records.
    pub fn total_time(&self) -> f64 {
        self.records.iter().map(|record| record.time).sum()
    }
}

/// A pending delete waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalRequest {
    pub id: String,
    pub prompt: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(accepted: bool) -> Self {
        if accepted {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalOutcome {
    Declined,
    Deleted,
    /// The remote delete failed; the list was refreshed anyway.
    Failed,
}

pub struct RecordStore {
    table: Arc<dyn RecordTable>,
    state: watch::Sender<StoreSnapshot>,
}

impl RecordStore {
    /// Creates an empty store in the loading state. Nothing is fetched until
    /// `fetch_all` is called.
    pub fn new(table: Arc<dyn RecordTable>) -> Self {
        let (state, _rx) = watch::channel(StoreSnapshot {
            records: Vec::new(),
            loading: true,
        });
        Self { table, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.borrow().clone()
    }

    pub fn records(&self) -> Vec<StudyRecord> {
        self.state.borrow().records.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn find(&self, id: &str) -> Option<StudyRecord> {
        self.state
            .borrow()
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Replaces the list with the remote rows. Failures are logged and leave
    /// the previous list in place; `loading` is cleared either way.
    pub async fn fetch_all(&self) {
        match self.table.select_all().await {
            Ok(records) => {
                info!("fetched {} study records", records.len());
                self.state.send_replace(StoreSnapshot {
                    records,
                    loading: false,
                });
            }
            Err(e) => {
                error!("failed to fetch study records: {}", e);
                self.state.send_modify(|snapshot| snapshot.loading = false);
            }
        }
    }

    pub async fn add(&self, input: StudyInput) -> Result<(), RemoteError> {
        if let Err(e) = self.table.insert(&input).await {
            error!("failed to insert study record: {}", e);
            return Err(e);
        }
        self.fetch_all().await;
        Ok(())
    }

    pub async fn update(&self, id: &str, input: StudyInput) -> Result<(), RemoteError> {
        if let Err(e) = self.table.update(id, &input).await {
            error!("failed to update study record {}: {}", id, e);
            return Err(e);
        }
        self.fetch_all().await;
        Ok(())
    }

    /// First half of a delete: the caller must show `prompt` and come back
    /// with the answer through `remove`.
    pub fn request_removal(&self, id: impl Into<String>) -> RemovalRequest {
        RemovalRequest {
            id: id.into(),
            prompt: REMOVAL_PROMPT,
        }
    }

    pub async fn remove(&self, request: RemovalRequest, answer: Confirmation) -> RemovalOutcome {
        if answer == Confirmation::Declined {
            return RemovalOutcome::Declined;
        }

        let outcome = match self.table.delete(&request.id).await {
            Ok(()) => RemovalOutcome::Deleted,
            Err(e) => {
                error!("failed to delete study record {}: {}", request.id, e);
                RemovalOutcome::Failed
            }
        };
        self.fetch_all().await;
        outcome
    }
}
