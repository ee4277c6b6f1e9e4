use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Path, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

use super::domain::{
    InterviewDraft, InterviewId, InterviewScores, Note, RejectionRequest, ScoreEntry, Synthesis,
    ValidationRequest,
};
use super::filter::ListFilter;
use super::repository::{
    InterviewRecord, InterviewRepository, NotificationPublisher, RepositoryError,
};
use super::rubric::RubricCategory;
use super::service::{InterviewService, InterviewServiceError};

type SharedService<R, N> = Arc<InterviewService<R, N>>;

/// Router builder exposing the rubric, scoring preview, and interview lifecycle endpoints.
pub fn interview_router<R, N>(service: SharedService<R, N>) -> Router
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/rubric", get(rubric_handler::<R, N>))
        .route(
            "/api/v1/interviews/score-preview",
            post(preview_handler::<R, N>),
        )
        .route(
            "/api/v1/interviews",
            post(create_handler::<R, N>).get(list_handler::<R, N>),
        )
        .route("/api/v1/interviews/:id", get(detail_handler::<R, N>))
        .route(
            "/api/v1/interviews/:id/scores/:category/:key",
            put(score_handler::<R, N>),
        )
        .route(
            "/api/v1/interviews/:id/synthesis",
            put(synthesis_handler::<R, N>),
        )
        .route(
            "/api/v1/interviews/:id/validate",
            post(validate_handler::<R, N>),
        )
        .route("/api/v1/interviews/:id/reject", post(reject_handler::<R, N>))
        .route("/api/v1/interviews/:id/export", get(export_handler::<R, N>))
        .with_state(service)
}

/// Score update as typed into the review grid; the note is checked before it reaches the service.
#[derive(Debug, Deserialize)]
pub struct ScoreUpdate {
    pub note: i64,
    #[serde(default)]
    pub observations: String,
}

/// JSON request body whose rejections are reported as `{"error": ...}` like every other failure.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

pub(crate) fn status_for(error: &InterviewServiceError) -> StatusCode {
    match error {
        InterviewServiceError::InvalidInput(_)
        | InterviewServiceError::Rating(_)
        | InterviewServiceError::UnknownCriterion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        InterviewServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        InterviewServiceError::Locked { .. }
        | InterviewServiceError::InvalidTransition { .. }
        | InterviewServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        InterviewServiceError::Repository(_) | InterviewServiceError::Notification(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) async fn rubric_handler<R, N>(State(service): State<SharedService<R, N>>) -> Response
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    (StatusCode::OK, axum::Json(service.rubric().view())).into_response()
}

pub(crate) async fn preview_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    JsonBody(scores): JsonBody<InterviewScores>,
) -> Response
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    (StatusCode::OK, axum::Json(service.preview(&scores))).into_response()
}

pub(crate) async fn create_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    JsonBody(draft): JsonBody<InterviewDraft>,
) -> Result<Response, AppError>
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let record = service.create(draft)?;
    let view = record.detail_view(service.aggregator());
    Ok((StatusCode::CREATED, axum::Json(view)).into_response())
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Query(filter): Query<ListFilter>,
) -> Result<Response, AppError>
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let entries = service.list(&filter)?;
    Ok((StatusCode::OK, axum::Json(entries)).into_response())
}

pub(crate) async fn detail_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(id): Path<String>,
) -> Result<Response, AppError>
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let view = service.detail(&InterviewId(id))?;
    Ok((StatusCode::OK, axum::Json(view)).into_response())
}

pub(crate) async fn score_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path((id, category, key)): Path<(String, String, String)>,
    JsonBody(update): JsonBody<ScoreUpdate>,
) -> Result<Response, AppError>
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let Some(category) = RubricCategory::parse(&category) else {
        let payload = json!({ "error": format!("unknown rubric category '{category}'") });
        return Ok((StatusCode::NOT_FOUND, axum::Json(payload)).into_response());
    };

    let note = Note::new(update.note).map_err(InterviewServiceError::from)?;
    let entry = ScoreEntry::with_observations(note, update.observations);

    let record = service.record_score(&InterviewId(id), category, &key, entry)?;
    Ok(detail_response(&service, record))
}

pub(crate) async fn synthesis_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(id): Path<String>,
    JsonBody(synthesis): JsonBody<Synthesis>,
) -> Result<Response, AppError>
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let record = service.update_synthesis(&InterviewId(id), synthesis)?;
    Ok(detail_response(&service, record))
}

pub(crate) async fn validate_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<ValidationRequest>,
) -> Result<Response, AppError>
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let record = service.validate(&InterviewId(id), request)?;
    Ok(detail_response(&service, record))
}

pub(crate) async fn reject_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<RejectionRequest>,
) -> Result<Response, AppError>
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let record = service.reject(&InterviewId(id), request)?;
    Ok(detail_response(&service, record))
}

pub(crate) async fn export_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(id): Path<String>,
) -> Result<Response, AppError>
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let sheet = service.export(&InterviewId(id))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        sheet.render(),
    )
        .into_response())
}

fn detail_response<R, N>(service: &InterviewService<R, N>, record: InterviewRecord) -> Response
where
    R: InterviewRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let view = record.detail_view(service.aggregator());
    (StatusCode::OK, axum::Json(view)).into_response()
}
