//! Read-only report endpoints. Earnings figures use each caregiver's current
//! hourly rate.

use axum::{
    Json,
    extract::{Query, State},
};
use carenest_types::api::{HouseRulesQuery, RequirementQuery};
use carenest_types::models::FamilySummary;
use carenest_types::reports::{
    AcceptedAppointment, ApplicantCount, ApplicationRosterEntry, CaregiverAveragePay,
    CaregiverCost, CaregiverEarnings, CaregiverHours,
};

use crate::error::ApiResult;
use crate::{AppState, run_blocking};

pub async fn accepted_appointments(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AcceptedAppointment>>> {
    let rows = run_blocking(&state, |db| db.accepted_appointments()).await?;
    Ok(Json(rows))
}

pub async fn caregiver_hours(State(state): State<AppState>) -> ApiResult<Json<Vec<CaregiverHours>>> {
    let rows = run_blocking(&state, |db| db.total_hours_per_caregiver()).await?;
    Ok(Json(rows))
}

pub async fn average_pay(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CaregiverAveragePay>>> {
    let rows = run_blocking(&state, |db| db.average_pay_per_caregiver()).await?;
    Ok(Json(rows))
}

pub async fn above_average_earners(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CaregiverEarnings>>> {
    let rows = run_blocking(&state, |db| db.above_average_earners()).await?;
    Ok(Json(rows))
}

pub async fn caregiver_costs(State(state): State<AppState>) -> ApiResult<Json<Vec<CaregiverCost>>> {
    let rows = run_blocking(&state, |db| db.caregiver_costs()).await?;
    Ok(Json(rows))
}

pub async fn applicant_counts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ApplicantCount>>> {
    let rows = run_blocking(&state, |db| db.applicant_counts()).await?;
    Ok(Json(rows))
}

pub async fn application_roster(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ApplicationRosterEntry>>> {
    let rows = run_blocking(&state, |db| db.application_roster()).await?;
    Ok(Json(rows))
}

/// `?keyword=` against job post requirements. Returns post ids.
pub async fn job_posts_by_requirement(
    State(state): State<AppState>,
    Query(query): Query<RequirementQuery>,
) -> ApiResult<Json<Vec<i64>>> {
    let ids = run_blocking(&state, move |db| db.job_posts_requiring(&query.keyword)).await?;
    Ok(Json(ids))
}

pub async fn families_by_house_rules(
    State(state): State<AppState>,
    Query(query): Query<HouseRulesQuery>,
) -> ApiResult<Json<Vec<FamilySummary>>> {
    let families = run_blocking(&state, move |db| {
        db.families_with_rule(&query.caregiver_type, &query.city, &query.rule)
    })
    .await?;
    Ok(Json(families))
}
