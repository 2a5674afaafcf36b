use axum::Json;
use axum::extract::{Path, Query};
use axum::response::{IntoResponse, Response};
use axum::routing::put;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use crate::editor::{EditorForm, RecordEditor};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::{RemovalOutcome, RemovalRequest};
use crate::view::{self, RecordsView};

/// Raw form fields as typed by the user; `time` stays text until validated.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub time: String,
}

#[derive(Deserialize)]
struct DeleteParams {
    confirm: Option<bool>,
}

#[derive(Serialize)]
struct DeleteResponse {
    outcome: RemovalOutcome,
    #[serde(flatten)]
    view: RecordsView,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/health", get(health))
        .route("/records", get(list_records).post(create_record))
        .route("/records/new/form", get(new_form))
        .route("/records/{id}", put(update_record).delete(delete_record))
        .route("/records/{id}/form", get(edit_form))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn page(State(state): State<AppState>) -> String {
    view::render_page(&state.store.snapshot())
}

async fn list_records(State(state): State<AppState>) -> Json<RecordsView> {
    Json(RecordsView::from(state.store.snapshot()))
}

async fn new_form() -> Result<Json<EditorForm>, AppError> {
    let mut editor = RecordEditor::for_create();
    editor.open(None)?;
    Ok(Json(editor.form()))
}

async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Result<Json<EditorForm>, AppError> {
    let record = state.store.find(&id).ok_or(AppError::NotFound)?;
    let mut editor = RecordEditor::for_edit();
    editor.open(Some(&record))?;
    Ok(Json(editor.form()))
}

async fn create_record(
    State(state): State<AppState>,
    Json(form): Json<RecordForm>
) -> Result<(StatusCode, Json<RecordsView>), AppError> {
    let mut editor = RecordEditor::for_create();
    editor.open(None)?;
    editor.set_title(form.title)?;
    editor.set_time(form.time)?;

    let store = &state.store;
    editor.submit(|input| store.add(input)).await?;

    Ok((StatusCode::CREATED, Json(RecordsView::from(store.snapshot()))))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<RecordForm>
) -> Result<Json<RecordsView>, AppError> {
    let record = state.store.find(&id).ok_or(AppError::NotFound)?;
    let mut editor = RecordEditor::for_edit();
    editor.open(Some(&record))?;
    editor.set_title(form.title)?;
    editor.set_time(form.time)?;

    let store = &state.store;
    editor.submit(|input| store.update(&record.id, input)).await?;

    Ok(Json(RecordsView::from(store.snapshot())))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>
) -> Response {
    let request: RemovalRequest = state.store.request_removal(id);
    let Some(answer) = params.confirm else {
        return (StatusCode::PRECONDITION_REQUIRED, Json(request)).into_response();
    };

    let outcome = state.store.remove(request, answer.into()).await;
    Json(DeleteResponse {
        outcome,
        view: RecordsView::from(state.store.snapshot()),
    })
    .into_response()
}
