use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{RecordTable, RemoteError};
use crate::models::{StudyInput, StudyRecord};

/// In-process table for local development; ids are random UUIDs like a
/// `uuid` primary key would assign.
#[derive(Default)]
pub struct InMemoryTable {
    rows: Mutex<Vec<StudyRecord>>,
}

impl InMemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<StudyRecord>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl RecordTable for InMemoryTable {
    async fn select_all(&self) -> Result<Vec<StudyRecord>, RemoteError> {
        Ok(self.rows.lock().await.clone())
    }

    async fn insert(&self, input: &StudyInput) -> Result<(), RemoteError> {
        let id = Uuid::new_v4().to_string();
        debug!("inserting in-memory row {}", id);
        self.rows.lock().await.push(StudyRecord {
            id,
            title: input.title.clone(),
            time: input.time,
        });
        Ok(())
    }

    async fn update(&self, id: &str, input: &StudyInput) -> Result<(), RemoteError> {
        if let Some(row) = self.rows.lock().await.iter_mut().find(|row| row.id == id) {
            row.title = input.title.clone();
            row.time = input.time;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.rows.lock().await.retain(|row| row.id != id);
        Ok(())
    }
}
