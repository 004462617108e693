use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use carenest_db::models::{FamilyMemberChanges, NewFamilyMember};
use carenest_types::api::{CreateFamilyMemberRequest, FamilyMemberFilter, UpdateFamilyMemberRequest};
use carenest_types::models::FamilyMember;

use crate::error::{ApiError, ApiResult};
use crate::password::hash_password;
use crate::{AppState, run_blocking};

pub async fn create_family_member(
    State(state): State<AppState>,
    Json(req): Json<CreateFamilyMemberRequest>,
) -> ApiResult<impl IntoResponse> {
    let member = run_blocking(&state, move |db| {
        let password_hash = hash_password(&req.password)?;
        db.create_family_member(NewFamilyMember {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            password_hash,
            city: req.city,
            address: req.address,
            care_recipient_info: req.care_recipient_info,
            house_rules: req.house_rules,
        })
        .map_err(ApiError::from)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn list_family_members(
    State(state): State<AppState>,
    Query(filter): Query<FamilyMemberFilter>,
) -> ApiResult<Json<Vec<FamilyMember>>> {
    let members = run_blocking(&state, move |db| db.list_family_members(&filter)).await?;
    Ok(Json(members))
}

pub async fn get_family_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<FamilyMember>> {
    let member = run_blocking(&state, move |db| db.get_family_member(id)).await?;
    Ok(Json(member))
}

pub async fn update_family_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateFamilyMemberRequest>,
) -> ApiResult<Json<FamilyMember>> {
    let member = run_blocking(&state, move |db| {
        let password_hash = req.password.as_deref().map(hash_password).transpose()?;
        db.update_family_member(
            id,
            FamilyMemberChanges {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                phone: req.phone,
                password_hash,
                city: req.city,
                address: req.address,
                care_recipient_info: req.care_recipient_info,
                house_rules: req.house_rules,
            },
        )
        .map_err(ApiError::from)
    })
    .await?;

    Ok(Json(member))
}

/// Cascades to the family's job posts, their applications and the family's
/// appointments. Messages keep their rows with the family side cleared.
pub async fn delete_family_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    run_blocking(&state, move |db| db.delete_family_member(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
