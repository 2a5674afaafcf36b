use serde::Serialize;

use crate::editor::format_time;
use crate::models::StudyRecord;
use crate::store::StoreSnapshot;

pub const HEADING: &str = "Study Log";
pub const LOADING: &str = "Loading...";

#[derive(Debug, Clone, Serialize)]
pub struct RecordsView {
    pub loading: bool,
    pub records: Vec<StudyRecord>,
    pub total_time: f64,
}

impl From<StoreSnapshot> for RecordsView {
    fn from(snapshot: StoreSnapshot) -> Self {
        let total_time = snapshot.total_time();
        Self {
            loading: snapshot.loading,
            records: snapshot.records,
            total_time,
        }
    }
}

pub fn total_label(total: f64) -> String {
    format!("Total: {} hours", format_time(total))
}

/// Plain-text page: heading, total, then one row per record.
pub fn render_page(snapshot: &StoreSnapshot) -> String {
    if snapshot.loading {
        return format!("{}\n", LOADING);
    }

    let rows: Vec<(&str, String)> = snapshot
        .records
        .iter()
        .map(|record| (record.title.as_str(), format_time(record.time)))
        .collect();

    let title_width = rows
        .iter()
        .map(|(title, _)| title.chars().count())
        .chain(std::iter::once("Title".len()))
        .max()
        .unwrap_or(0);
    let time_width = rows
        .iter()
        .map(|(_, time)| time.len())
        .chain(std::iter::once("Time".len()))
        .max()
        .unwrap_or(0);

    let mut page = format!("{}\n\n{}\n\n", HEADING, total_label(snapshot.total_time()));
    page.push_str(&format!("{:<title_width$}  {:>time_width$}\n", "Title", "Time"));
    for (title, time) in rows {
        page.push_str(&format!("{:<title_width$}  {:>time_width$}\n", title, time));
    }
    page
}
