use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::analysis::SentimentClassifier;
use super::domain::{SurveyId, SurveyMetadata, SurveySubmission};
use super::repository::{AlertNotifier, RepositoryError, SurveyRepository};
use super::service::{SubmissionServiceError, SurveySubmissionService};

/// Router builder exposing HTTP endpoints for survey intake and analysis.
pub fn submission_router<R, N, C>(service: Arc<SurveySubmissionService<R, N, C>>) -> Router
where
    R: SurveyRepository + 'static,
    N: AlertNotifier + 'static,
    C: SentimentClassifier + 'static,
{
    Router::new()
        .route("/api/v1/surveys", post(create_handler::<R, N, C>))
        .route(
            "/api/v1/surveys/:survey_id/responses",
            post(submit_handler::<R, N, C>),
        )
        .route(
            "/api/v1/surveys/:survey_id/analysis",
            get(analysis_handler::<R, N, C>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R, N, C>(
    State(service): State<Arc<SurveySubmissionService<R, N, C>>>,
    axum::Json(metadata): axum::Json<SurveyMetadata>,
) -> Response
where
    R: SurveyRepository + 'static,
    N: AlertNotifier + 'static,
    C: SentimentClassifier + 'static,
{
    match service.create_survey(metadata) {
        Ok(record) => {
            let payload = json!({
                "survey_id": record.survey_id.0,
                "status": record.status.label(),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<R, N, C>(
    State(service): State<Arc<SurveySubmissionService<R, N, C>>>,
    Path(survey_id): Path<String>,
    axum::Json(submission): axum::Json<SurveySubmission>,
) -> Response
where
    R: SurveyRepository + 'static,
    N: AlertNotifier + 'static,
    C: SentimentClassifier + 'static,
{
    let id = SurveyId(survey_id);
    match service.submit(&id, submission, Utc::now()).await {
        Ok(record) => {
            let view = record.analysis_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn analysis_handler<R, N, C>(
    State(service): State<Arc<SurveySubmissionService<R, N, C>>>,
    Path(survey_id): Path<String>,
) -> Response
where
    R: SurveyRepository + 'static,
    N: AlertNotifier + 'static,
    C: SentimentClassifier + 'static,
{
    let id = SurveyId(survey_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.analysis_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: SubmissionServiceError) -> Response {
    let status = match &err {
        SubmissionServiceError::Expired => StatusCode::GONE,
        SubmissionServiceError::AlreadyAnswered => StatusCode::CONFLICT,
        SubmissionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SubmissionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        SubmissionServiceError::Repository(RepositoryError::Unavailable(_))
        | SubmissionServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
