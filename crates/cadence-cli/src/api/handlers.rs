use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cadence_core::error::CoreError;
use cadence_core::models::*;
use cadence_core::repository::{
    ActionRepository, CalendarRepository, CategoryRepository, ExceptionRepository,
    MaterializationRepository, NoteRepository, OccurrenceRepository, SqliteRepository,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Maps a core error to a status and a client-safe message.
///
/// Validation and lookup failures carry their reason. Anything else is
/// logged in full and answered with a generic message.
fn api_error(e: CoreError) -> (StatusCode, String) {
    if e.is_validation() {
        tracing::warn!("Validation error: {}", e);
        return (StatusCode::BAD_REQUEST, e.to_string());
    }
    if e.is_not_found() {
        return (StatusCode::NOT_FOUND, e.to_string());
    }

    match &e {
        CoreError::PartialMaterialization { created, expected, source } => {
            tracing::error!(created, expected, error = %source, "materialization rolled back");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(
                    "Materialization failed: created {} of {} occurrences before rolling back",
                    created, expected
                ),
            )
        }
        _ => {
            tracing::error!("Internal error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Calendar events
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub async fn get_range(
    State(repo): State<SqliteRepository>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Json<Vec<DayGroup>>> {
    repo.query_range(params.start_date, params.end_date)
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn get_calendar_event(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DayGroup>> {
    repo.resolve_event(id)
        .await
        .map_err(api_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("No action or occurrence with id {}", id)))
}

pub async fn create_calendar_event(
    State(repo): State<SqliteRepository>,
    Json(input): Json<NewCalendarEventData>,
) -> ApiResult<(StatusCode, Json<Vec<Occurrence>>)> {
    repo.create_calendar_event(input)
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(api_error)
}

// ============================================================
// Actions
// ============================================================

pub async fn list_actions(State(repo): State<SqliteRepository>) -> ApiResult<Json<Vec<Action>>> {
    repo.find_actions().await.map(Json).map_err(api_error)
}

pub async fn get_action(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Action>> {
    repo.find_action_by_id(id)
        .await
        .map_err(api_error)?
        .map(Json)
        .ok_or_else(|| api_error(CoreError::ActionNotFound(id)))
}

pub async fn create_action(
    State(repo): State<SqliteRepository>,
    Json(input): Json<NewActionData>,
) -> ApiResult<(StatusCode, Json<Action>)> {
    repo.add_action(input)
        .await
        .map(|a| (StatusCode::CREATED, Json(a)))
        .map_err(api_error)
}

pub async fn update_action(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateActionData>,
) -> ApiResult<Json<Action>> {
    repo.update_action(id, input).await.map(Json).map_err(api_error)
}

pub async fn delete_action(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repo.delete_action(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(api_error)
}

pub async fn list_action_occurrences(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Occurrence>>> {
    repo.find_occurrences_for_action(id)
        .await
        .map(Json)
        .map_err(api_error)
}

pub async fn materialize_action(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MaterializationSummary>> {
    repo.materialize_action(id).await.map(Json).map_err(api_error)
}

pub async fn repair(State(repo): State<SqliteRepository>) -> ApiResult<Json<RepairSummary>> {
    repo.materialize_all().await.map(Json).map_err(api_error)
}

// ============================================================
// Exceptions
// ============================================================

pub async fn list_exceptions(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<OccurrenceException>>> {
    repo.find_exceptions(id).await.map(Json).map_err(api_error)
}

pub async fn add_exception(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewExceptionData>,
) -> ApiResult<(StatusCode, Json<OccurrenceException>)> {
    repo.add_exception(id, input)
        .await
        .map(|e| (StatusCode::CREATED, Json(e)))
        .map_err(api_error)
}

pub async fn remove_exception(
    State(repo): State<SqliteRepository>,
    Path((id, date)): Path<(Uuid, NaiveDate)>,
) -> ApiResult<StatusCode> {
    repo.remove_exception(id, date)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(api_error)
}

// ============================================================
// Occurrences and notes
// ============================================================

pub async fn update_occurrence(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateOccurrenceData>,
) -> ApiResult<Json<Occurrence>> {
    repo.update_occurrence(id, input).await.map(Json).map_err(api_error)
}

pub async fn list_notes(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Note>>> {
    if repo.find_occurrence_by_id(id).await.map_err(api_error)?.is_none() {
        return Err(api_error(CoreError::OccurrenceNotFound(id)));
    }
    repo.find_notes_for_occurrence(id).await.map(Json).map_err(api_error)
}

pub async fn add_note(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewNoteData>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    repo.add_note(id, input)
        .await
        .map(|n| (StatusCode::CREATED, Json(n)))
        .map_err(api_error)
}

pub async fn delete_note(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repo.delete_note(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(api_error)
}

// ============================================================
// Categories
// ============================================================

pub async fn list_categories(State(repo): State<SqliteRepository>) -> ApiResult<Json<Vec<Category>>> {
    repo.find_categories().await.map(Json).map_err(api_error)
}

pub async fn create_category(
    State(repo): State<SqliteRepository>,
    Json(input): Json<NewCategoryData>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    repo.add_category(input)
        .await
        .map(|c| (StatusCode::CREATED, Json(c)))
        .map_err(api_error)
}

pub async fn delete_category(
    State(repo): State<SqliteRepository>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repo.delete_category(id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(api_error)
}
