use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ApplicationForm, ApplicationId, ApplicationStatus, DeliverableForm, InternshipForm,
    InternshipId, InternshipStatus, ProgressEntryId, SubmissionId, SubmissionStatus, UserId,
};
use super::repository::{MarketplaceRepository, ProfileStore, RepositoryError};
use super::service::{MarketplaceService, WorkflowError};

/// Router builder exposing the workflow operations over HTTP. Any transport
/// could carry these; this is the one the API service mounts.
pub fn marketplace_router<R, P>(service: Arc<MarketplaceService<R, P>>) -> Router
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    Router::new()
        .route("/api/v1/internships", post(post_internship_handler::<R, P>))
        .route(
            "/api/v1/internships/:internship_id/close",
            post(close_internship_handler::<R, P>),
        )
        .route("/api/v1/applications", post(apply_handler::<R, P>))
        .route(
            "/api/v1/applications/:application_id",
            get(application_status_handler::<R, P>),
        )
        .route(
            "/api/v1/applications/:application_id/review",
            post(review_application_handler::<R, P>),
        )
        .route(
            "/api/v1/applications/:application_id/withdraw",
            post(withdraw_handler::<R, P>),
        )
        .route("/api/v1/submissions", post(submit_deliverable_handler::<R, P>))
        .route(
            "/api/v1/submissions/:submission_id/review",
            post(review_submission_handler::<R, P>),
        )
        .route("/api/v1/certificates", post(issue_certificate_handler::<R, P>))
        .route("/api/v1/progress", post(log_progress_handler::<R, P>))
        .route(
            "/api/v1/progress/:entry_id/comment",
            post(comment_progress_handler::<R, P>),
        )
        .with_state(service)
}

fn error_response(error: WorkflowError) -> Response {
    let status = match &error {
        WorkflowError::Unauthorized(_) | WorkflowError::ApplicationMismatch => {
            StatusCode::FORBIDDEN
        }
        WorkflowError::DuplicateApplication => StatusCode::CONFLICT,
        WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkflowError::InvalidTransition { .. }
        | WorkflowError::InvalidStatus(_)
        | WorkflowError::InternshipUnavailable
        | WorkflowError::ApplicationNotAccepted
        | WorkflowError::SubmissionNotApproved => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        WorkflowError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        WorkflowError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostInternshipRequest {
    pub(crate) mentor_id: UserId,
    #[serde(flatten)]
    pub(crate) form: InternshipForm,
}

pub(crate) async fn post_internship_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    axum::Json(request): axum::Json<PostInternshipRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.post_internship(&request.mentor_id, request.form) {
        Ok(internship) => (StatusCode::CREATED, axum::Json(internship)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloseInternshipRequest {
    pub(crate) actor_id: UserId,
    pub(crate) new_status: InternshipStatus,
}

pub(crate) async fn close_internship_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    Path(internship_id): Path<String>,
    axum::Json(request): axum::Json<CloseInternshipRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    let id = InternshipId(internship_id);
    match service.close_internship(&id, &request.actor_id, request.new_status) {
        Ok(internship) => (StatusCode::OK, axum::Json(internship)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyRequest {
    pub(crate) student_id: UserId,
    pub(crate) internship_id: InternshipId,
    #[serde(flatten)]
    pub(crate) form: ApplicationForm,
}

pub(crate) async fn apply_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    axum::Json(request): axum::Json<ApplyRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.apply_to_internship(&request.student_id, &request.internship_id, request.form) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn application_status_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    let id = ApplicationId(application_id);
    match service.application_status(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewApplicationRequest {
    pub(crate) actor_id: UserId,
    pub(crate) new_status: ApplicationStatus,
}

pub(crate) async fn review_application_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<ReviewApplicationRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    let id = ApplicationId(application_id);
    match service.review_application(&id, request.new_status, &request.actor_id) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WithdrawRequest {
    pub(crate) student_id: UserId,
}

pub(crate) async fn withdraw_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<WithdrawRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    let id = ApplicationId(application_id);
    match service.withdraw_application(&id, &request.student_id) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitDeliverableRequest {
    pub(crate) student_id: UserId,
    pub(crate) application_id: ApplicationId,
    #[serde(flatten)]
    pub(crate) form: DeliverableForm,
}

pub(crate) async fn submit_deliverable_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    axum::Json(request): axum::Json<SubmitDeliverableRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.submit_deliverable(&request.student_id, &request.application_id, request.form) {
        Ok(submission) => (StatusCode::CREATED, axum::Json(submission)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewSubmissionRequest {
    pub(crate) actor_id: UserId,
    pub(crate) new_status: SubmissionStatus,
    #[serde(default)]
    pub(crate) feedback: Option<String>,
}

pub(crate) async fn review_submission_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    Path(submission_id): Path<String>,
    axum::Json(request): axum::Json<ReviewSubmissionRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    let id = SubmissionId(submission_id);
    match service.review_submission(&id, request.new_status, request.feedback, &request.actor_id)
    {
        Ok(submission) => (StatusCode::OK, axum::Json(submission)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueCertificateRequest {
    pub(crate) application_id: ApplicationId,
    pub(crate) student_id: UserId,
}

pub(crate) async fn issue_certificate_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    axum::Json(request): axum::Json<IssueCertificateRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.issue_certificate_if_eligible(&request.application_id, &request.student_id) {
        Ok(issued) => {
            let status = if issued.already_existed {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, axum::Json(issued)).into_response()
        }
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogProgressRequest {
    pub(crate) student_id: UserId,
    pub(crate) application_id: ApplicationId,
    pub(crate) week_number: u16,
    pub(crate) description: String,
}

pub(crate) async fn log_progress_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    axum::Json(request): axum::Json<LogProgressRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    match service.log_progress(
        &request.student_id,
        &request.application_id,
        request.week_number,
        request.description,
    ) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentProgressRequest {
    pub(crate) actor_id: UserId,
    pub(crate) comment: String,
}

pub(crate) async fn comment_progress_handler<R, P>(
    State(service): State<Arc<MarketplaceService<R, P>>>,
    Path(entry_id): Path<String>,
    axum::Json(request): axum::Json<CommentProgressRequest>,
) -> Response
where
    R: MarketplaceRepository + 'static,
    P: ProfileStore + 'static,
{
    let id = ProgressEntryId(entry_id);
    match service.comment_progress(&id, request.comment, &request.actor_id) {
        Ok(entry) => (StatusCode::OK, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}
