use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use carenest_db::models::{AppointmentChanges, NewAppointment};
use carenest_types::api::{AppointmentFilter, CreateAppointmentRequest, UpdateAppointmentRequest};
use carenest_types::models::Appointment;

use crate::error::ApiResult;
use crate::{AppState, run_blocking};

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<CreateAppointmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewAppointment {
        caregiver_id: req.caregiver_id,
        family_id: req.family_id,
        appointment_date: req.appointment_date,
        start_time: req.start_time,
        duration_hours: req.duration_hours,
        status: req.status,
        notes: req.notes,
    };
    let appointment = run_blocking(&state, move |db| db.create_appointment(new)).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn list_appointments(
    State(state): State<AppState>,
    Query(filter): Query<AppointmentFilter>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let appointments = run_blocking(&state, move |db| db.list_appointments(&filter)).await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Appointment>> {
    let appointment = run_blocking(&state, move |db| db.get_appointment(id)).await?;
    Ok(Json(appointment))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> ApiResult<Json<Appointment>> {
    let changes = AppointmentChanges {
        appointment_date: req.appointment_date,
        start_time: req.start_time,
        duration_hours: req.duration_hours,
        status: req.status,
        notes: req.notes,
    };
    let appointment = run_blocking(&state, move |db| db.update_appointment(id, changes)).await?;
    Ok(Json(appointment))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    run_blocking(&state, move |db| db.delete_appointment(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
