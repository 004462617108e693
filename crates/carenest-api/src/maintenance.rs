//! Bulk administrative statements. Each answers with the number of rows it
//! changed.

use axum::{Json, extract::State};
use carenest_types::api::{
    AddressKeywordRequest, AffectedRows, CaregiverPhoneRequest, FamilyNameRequest,
};

use crate::error::ApiResult;
use crate::{AppState, run_blocking};

pub async fn raise_hourly_rates(State(state): State<AppState>) -> ApiResult<Json<AffectedRows>> {
    let affected = run_blocking(&state, |db| db.raise_hourly_rates()).await?;
    Ok(Json(AffectedRows { affected }))
}

pub async fn update_caregiver_phone(
    State(state): State<AppState>,
    Json(req): Json<CaregiverPhoneRequest>,
) -> ApiResult<Json<AffectedRows>> {
    let affected = run_blocking(&state, move |db| {
        db.update_caregiver_phone_by_name(&req.first_name, &req.last_name, &req.phone)
    })
    .await?;
    Ok(Json(AffectedRows { affected }))
}

pub async fn delete_job_posts_by_family(
    State(state): State<AppState>,
    Json(req): Json<FamilyNameRequest>,
) -> ApiResult<Json<AffectedRows>> {
    let affected = run_blocking(&state, move |db| {
        db.delete_job_posts_by_family_name(&req.first_name, &req.last_name)
    })
    .await?;
    Ok(Json(AffectedRows { affected }))
}

pub async fn delete_families_by_address(
    State(state): State<AppState>,
    Json(req): Json<AddressKeywordRequest>,
) -> ApiResult<Json<AffectedRows>> {
    let affected =
        run_blocking(&state, move |db| db.delete_families_by_address(&req.keyword)).await?;
    Ok(Json(AffectedRows { affected }))
}
