pub mod applications;
pub mod appointments;
pub mod caregivers;
pub mod error;
pub mod families;
pub mod job_posts;
pub mod maintenance;
pub mod messages;
pub mod password;
pub mod reports;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use carenest_db::Database;
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// Every route of the service, without transport layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(
            "/caregivers",
            post(caregivers::create_caregiver).get(caregivers::list_caregivers),
        )
        .route(
            "/caregivers/{id}",
            get(caregivers::get_caregiver)
                .patch(caregivers::update_caregiver)
                .delete(caregivers::delete_caregiver),
        )
        .route(
            "/families",
            post(families::create_family_member).get(families::list_family_members),
        )
        .route(
            "/families/{id}",
            get(families::get_family_member)
                .patch(families::update_family_member)
                .delete(families::delete_family_member),
        )
        .route(
            "/job-posts",
            post(job_posts::create_job_post).get(job_posts::list_job_posts),
        )
        .route(
            "/job-posts/{id}",
            get(job_posts::get_job_post)
                .patch(job_posts::update_job_post)
                .delete(job_posts::delete_job_post),
        )
        .route(
            "/applications",
            post(applications::create_job_application).get(applications::list_job_applications),
        )
        .route(
            "/applications/{id}",
            get(applications::get_job_application)
                .patch(applications::update_job_application)
                .delete(applications::delete_job_application),
        )
        .route(
            "/appointments",
            post(appointments::create_appointment).get(appointments::list_appointments),
        )
        .route(
            "/appointments/{id}",
            get(appointments::get_appointment)
                .patch(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route(
            "/messages",
            post(messages::send_message).get(messages::list_messages),
        )
        .route(
            "/messages/{id}",
            get(messages::get_message)
                .patch(messages::update_message)
                .delete(messages::delete_message),
        )
        .route("/reports/accepted-appointments", get(reports::accepted_appointments))
        .route("/reports/caregiver-hours", get(reports::caregiver_hours))
        .route("/reports/average-pay", get(reports::average_pay))
        .route("/reports/above-average-earners", get(reports::above_average_earners))
        .route("/reports/caregiver-costs", get(reports::caregiver_costs))
        .route("/reports/applicant-counts", get(reports::applicant_counts))
        .route("/reports/application-roster", get(reports::application_roster))
        .route("/reports/job-posts-by-requirement", get(reports::job_posts_by_requirement))
        .route("/reports/families-by-house-rules", get(reports::families_by_house_rules))
        .route("/maintenance/raise-hourly-rates", post(maintenance::raise_hourly_rates))
        .route("/maintenance/caregiver-phone", post(maintenance::update_caregiver_phone))
        .route(
            "/maintenance/delete-job-posts-by-family",
            post(maintenance::delete_job_posts_by_family),
        )
        .route(
            "/maintenance/delete-families-by-address",
            post(maintenance::delete_families_by_address),
        )
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Caregivers Platform API is running" }))
}

/// Runs a store call on the blocking pool so SQLite never stalls the runtime.
pub(crate) async fn run_blocking<F, T, E>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&Database) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| ApiError::Internal(format!("spawn_blocking join error: {}", e)))?
        .map_err(Into::into)
}
