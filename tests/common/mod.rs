#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use study_log::models::{StudyInput, StudyRecord};
use study_log::remote::{RecordTable, RemoteError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select,
    Insert(StudyInput),
    Update(String, StudyInput),
    Delete(String),
}

/// Scriptable remote table that records every call it receives.
#[derive(Default)]
pub struct FakeTable {
    rows: Mutex<Vec<StudyRecord>>,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
    pub fail_select: AtomicBool,
    pub fail_insert: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    /// Row that "another client" inserts right after our next insert.
    pub concurrent_insert: Mutex<Option<StudyRecord>>,
}

impl FakeTable {
    pub fn with_rows(rows: Vec<StudyRecord>) -> Self {
        let table = Self::default();
        table.next_id.store(rows.len() + 1, Ordering::SeqCst);
        *table.rows.lock().unwrap() = rows;
        table
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    pub fn rows(&self) -> Vec<StudyRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn fail(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    fn rejected(&self) -> RemoteError {
        RemoteError::Status {
            status: 500,
            code: None,
            message: "scripted failure".to_string(),
        }
    }
}

pub fn record(id: &str, title: &str, time: f64) -> StudyRecord {
    StudyRecord {
        id: id.to_string(),
        title: title.to_string(),
        time,
    }
}

pub fn input(title: &str, time: f64) -> StudyInput {
    StudyInput {
        title: title.to_string(),
        time,
    }
}

#[async_trait]
impl RecordTable for FakeTable {
    async fn select_all(&self) -> Result<Vec<StudyRecord>, RemoteError> {
        self.calls.lock().unwrap().push(Call::Select);
        if self.fail_select.load(Ordering::SeqCst) {
            return Err(self.rejected());
        }
        Ok(self.rows())
    }

    async fn insert(&self, input: &StudyInput) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(Call::Insert(input.clone()));
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(self.rejected());
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        rows.push(record(&id.to_string(), &input.title, input.time));
        if let Some(other) = self.concurrent_insert.lock().unwrap().take() {
            rows.push(other);
        }
        Ok(())
    }

    async fn update(&self, id: &str, input: &StudyInput) -> Result<(), RemoteError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(id.to_string(), input.clone()));
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(self.rejected());
        }
        if let Some(row) = self.rows.lock().unwrap().iter_mut().find(|r| r.id == id) {
            row.title = input.title.clone();
            row.time = input.time;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(Call::Delete(id.to_string()));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(self.rejected());
        }
        self.rows.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}
