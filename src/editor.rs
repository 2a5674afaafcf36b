//! Form state machine for creating and editing a study record.

use std::fmt::Display;
use std::future::Future;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{StudyInput, StudyRecord};

pub const CREATE_HEADER: &str = "New record";
pub const EDIT_HEADER: &str = "Edit record";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("title is required")]
    TitleRequired,

    #[error("time is required")]
    TimeRequired,

    #[error("time must be a number")]
    TimeNotANumber,

    // The check rejects 0 too; only the wording says otherwise.
    #[error("time must be ≥ 0")]
    TimeNotPositive,

    #[error("submission failed")]
    SubmissionFailed,

    #[error("a submission is already in progress")]
    Busy,

    #[error("the editor is closed")]
    Closed,

    #[error("no submission is pending")]
    NotSubmitting,
}

impl EditorError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EditorError::TitleRequired
                | EditorError::TimeRequired
                | EditorError::TimeNotANumber
                | EditorError::TimeNotPositive
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorState {
    Closed,
    Editing,
    Submitting,
}

/// Field values as displayed, for rendering the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorForm {
    pub header: String,
    pub title: String,
    pub time: String,
}

#[derive(Debug, Clone)]
pub struct RecordEditor {
    header: String,
    state: EditorState,
    title: String,
    time: String,
    last_error: Option<EditorError>,
}

impl RecordEditor {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            state: EditorState::Closed,
            title: String::new(),
            time: String::new(),
            last_error: None,
        }
    }

    pub fn for_create() -> Self {
        Self::new(CREATE_HEADER)
    }

    pub fn for_edit() -> Self {
        Self::new(EDIT_HEADER)
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != EditorState::Closed
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn last_error(&self) -> Option<&EditorError> {
        self.last_error.as_ref()
    }

    pub fn form(&self) -> EditorForm {
        EditorForm {
            header: self.header.clone(),
            title: self.title.clone(),
            time: self.time.clone(),
        }
    }

    /// Opens the form, filling the fields from `initial` or clearing them.
    ///
    /// Opening an already open editor re-synchronizes the fields as well, so
    /// values from one edit session never carry over into the next.
    pub fn open(&mut self, initial: Option<&StudyRecord>) -> Result<(), EditorError> {
        if self.state == EditorState::Submitting {
            return Err(self.report(EditorError::Busy));
        }
        match initial {
            Some(record) => {
                self.title = record.title.clone();
                self.time = format_time(record.time);
            }
            None => {
                self.title.clear();
                self.time.clear();
            }
        }
        self.last_error = None;
        self.state = EditorState::Editing;
        Ok(())
    }

    /// Cancels the session without submitting.
    pub fn close(&mut self) -> Result<(), EditorError> {
        if self.state == EditorState::Submitting {
            return Err(self.report(EditorError::Busy));
        }
        self.state = EditorState::Closed;
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.title = title.into();
        Ok(())
    }

    pub fn set_time(&mut self, time: impl Into<String>) -> Result<(), EditorError> {
        self.ensure_editing()?;
        self.time = time.into();
        Ok(())
    }

    /// Runs the validation chain in order, stopping at the first failure.
    pub fn validate(&self) -> Result<StudyInput, EditorError> {
        if self.title.trim().is_empty() {
            return Err(EditorError::TitleRequired);
        }
        let raw = self.time.trim();
        if raw.is_empty() {
            return Err(EditorError::TimeRequired);
        }
        let time = parse_time(raw).ok_or(EditorError::TimeNotANumber)?;
        if time <= 0.0 {
            return Err(EditorError::TimeNotPositive);
        }
        Ok(StudyInput {
            title: self.title.clone(),
            time,
        })
    }

    /// Validates and moves to `Submitting`, returning the input to hand to
    /// the submit handler. Pair with `finish_submit`.
    pub fn begin_submit(&mut self) -> Result<StudyInput, EditorError> {
        self.ensure_editing()?;
        match self.validate() {
            Ok(input) => {
                self.last_error = None;
                self.state = EditorState::Submitting;
                Ok(input)
            }
            Err(e) => {
                debug!("rejected {} form: {}", self.header, e);
                Err(self.report(e))
            }
        }
    }

    /// Closes on success; on failure returns to `Editing` with the entered
    /// values kept so the user can retry.
    pub fn finish_submit<E: Display>(&mut self, result: Result<(), E>) -> Result<(), EditorError> {
        if self.state != EditorState::Submitting {
            return Err(EditorError::NotSubmitting);
        }
        match result {
            Ok(()) => {
                self.state = EditorState::Closed;
                Ok(())
            }
            Err(e) => {
                warn!("{} submission failed: {}", self.header, e);
                self.state = EditorState::Editing;
                Err(self.report(EditorError::SubmissionFailed))
            }
        }
    }

    /// Validates, calls `handler` once with the parsed input, and closes the
    /// editor if it succeeds.
    pub async fn submit<F, Fut, E>(&mut self, handler: F) -> Result<(), EditorError>
    where
        F: FnOnce(StudyInput) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let input = self.begin_submit()?;
        let result = handler(input).await;
        self.finish_submit(result)
    }

    fn ensure_editing(&mut self) -> Result<(), EditorError> {
        match self.state {
            EditorState::Editing => Ok(()),
            EditorState::Submitting => Err(self.report(EditorError::Busy)),
            EditorState::Closed => Err(self.report(EditorError::Closed)),
        }
    }

    fn report(&mut self, error: EditorError) -> EditorError {
        self.last_error = Some(error.clone());
        error
    }
}

fn parse_time(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|time| time.is_finite())
}

/// Shortest form of an hours value: `2.0` shows as `2`, `2.5` as `2.5`.
pub fn format_time(time: f64) -> String {
    time.to_string()
}
