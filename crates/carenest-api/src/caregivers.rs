use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use carenest_db::models::{CaregiverChanges, NewCaregiver};
use carenest_types::api::{CaregiverFilter, CreateCaregiverRequest, UpdateCaregiverRequest};
use carenest_types::models::Caregiver;

use crate::error::{ApiError, ApiResult};
use crate::password::hash_password;
use crate::{AppState, run_blocking};

pub async fn create_caregiver(
    State(state): State<AppState>,
    Json(req): Json<CreateCaregiverRequest>,
) -> ApiResult<impl IntoResponse> {
    let caregiver = run_blocking(&state, move |db| {
        // Hashing is CPU-bound; keep it off the runtime threads
        let password_hash = hash_password(&req.password)?;
        db.create_caregiver(NewCaregiver {
            first_name: req.first_name,
            last_name: req.last_name,
            caregiver_type: req.caregiver_type,
            gender: req.gender,
            photo_url: req.photo_url,
            email: req.email,
            phone: req.phone,
            city: req.city,
            hourly_rate: req.hourly_rate,
            bio: req.bio,
            password_hash,
        })
        .map_err(ApiError::from)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(caregiver)))
}

pub async fn list_caregivers(
    State(state): State<AppState>,
    Query(filter): Query<CaregiverFilter>,
) -> ApiResult<Json<Vec<Caregiver>>> {
    let caregivers = run_blocking(&state, move |db| db.list_caregivers(&filter)).await?;
    Ok(Json(caregivers))
}

pub async fn get_caregiver(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Caregiver>> {
    let caregiver = run_blocking(&state, move |db| db.get_caregiver(id)).await?;
    Ok(Json(caregiver))
}

pub async fn update_caregiver(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCaregiverRequest>,
) -> ApiResult<Json<Caregiver>> {
    let caregiver = run_blocking(&state, move |db| {
        let password_hash = req.password.as_deref().map(hash_password).transpose()?;
        db.update_caregiver(
            id,
            CaregiverChanges {
                first_name: req.first_name,
                last_name: req.last_name,
                caregiver_type: req.caregiver_type,
                gender: req.gender,
                photo_url: req.photo_url,
                email: req.email,
                phone: req.phone,
                city: req.city,
                hourly_rate: req.hourly_rate,
                bio: req.bio,
                password_hash,
            },
        )
        .map_err(ApiError::from)
    })
    .await?;

    Ok(Json(caregiver))
}

pub async fn delete_caregiver(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    run_blocking(&state, move |db| db.delete_caregiver(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
