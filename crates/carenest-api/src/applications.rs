use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use carenest_db::models::{JobApplicationChanges, NewJobApplication};
use carenest_types::api::{
    CreateJobApplicationRequest, JobApplicationFilter, UpdateJobApplicationRequest,
};
use carenest_types::models::JobApplication;

use crate::error::ApiResult;
use crate::{AppState, run_blocking};

pub async fn create_job_application(
    State(state): State<AppState>,
    Json(req): Json<CreateJobApplicationRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewJobApplication {
        job_post_id: req.job_post_id,
        caregiver_id: req.caregiver_id,
        cover_message: req.cover_message,
        status: req.status,
    };
    let application = run_blocking(&state, move |db| db.create_job_application(new)).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn list_job_applications(
    State(state): State<AppState>,
    Query(filter): Query<JobApplicationFilter>,
) -> ApiResult<Json<Vec<JobApplication>>> {
    let applications = run_blocking(&state, move |db| db.list_job_applications(&filter)).await?;
    Ok(Json(applications))
}

pub async fn get_job_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<JobApplication>> {
    let application = run_blocking(&state, move |db| db.get_job_application(id)).await?;
    Ok(Json(application))
}

pub async fn update_job_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateJobApplicationRequest>,
) -> ApiResult<Json<JobApplication>> {
    let changes = JobApplicationChanges {
        cover_message: req.cover_message,
        status: req.status,
    };
    let application =
        run_blocking(&state, move |db| db.update_job_application(id, changes)).await?;
    Ok(Json(application))
}

pub async fn delete_job_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    run_blocking(&state, move |db| db.delete_job_application(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
