use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use carenest_db::models::{JobPostChanges, NewJobPost};
use carenest_types::api::{CreateJobPostRequest, JobPostFilter, UpdateJobPostRequest};
use carenest_types::models::JobPost;

use crate::error::ApiResult;
use crate::{AppState, run_blocking};

pub async fn create_job_post(
    State(state): State<AppState>,
    Json(req): Json<CreateJobPostRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewJobPost {
        family_id: req.family_id,
        title: req.title,
        caregiver_type: req.caregiver_type,
        city: req.city,
        care_recipient_age: req.care_recipient_age,
        description: req.description,
        preferred_time_slots: req.preferred_time_slots,
        frequency: req.frequency,
        requirements: req.requirements,
    };
    let post = run_blocking(&state, move |db| db.create_job_post(new)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn list_job_posts(
    State(state): State<AppState>,
    Query(filter): Query<JobPostFilter>,
) -> ApiResult<Json<Vec<JobPost>>> {
    let posts = run_blocking(&state, move |db| db.list_job_posts(&filter)).await?;
    Ok(Json(posts))
}

pub async fn get_job_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<JobPost>> {
    let post = run_blocking(&state, move |db| db.get_job_post(id)).await?;
    Ok(Json(post))
}

pub async fn update_job_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateJobPostRequest>,
) -> ApiResult<Json<JobPost>> {
    let changes = JobPostChanges {
        title: req.title,
        caregiver_type: req.caregiver_type,
        city: req.city,
        care_recipient_age: req.care_recipient_age,
        description: req.description,
        preferred_time_slots: req.preferred_time_slots,
        frequency: req.frequency,
        requirements: req.requirements,
    };
    let post = run_blocking(&state, move |db| db.update_job_post(id, changes)).await?;
    Ok(Json(post))
}

pub async fn delete_job_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    run_blocking(&state, move |db| db.delete_job_post(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::testing::{seeded_app, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn create_embeds_family_and_keeps_slot_order() {
        let app = seeded_app();
        let (status, body) = send(
            &app,
            "POST",
            "/job-posts",
            Some(json!({
                "family_id": 4,
                "title": "Weekend Companion",
                "caregiver_type": "Elderly Care",
                "city": "Astana",
                "care_recipient_age": 80,
                "preferred_time_slots": ["Sat 10:00-14:00", "Sun 10:00-14:00"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["preferred_time_slots"], json!(["Sat 10:00-14:00", "Sun 10:00-14:00"]));
        assert_eq!(body["family"]["last_name"], "Nurtay");

        // Newest first
        let (_, list) = send(&app, "GET", "/job-posts", None).await;
        assert_eq!(list[0]["id"], body["id"]);
    }

    #[tokio::test]
    async fn unknown_family_is_404_and_negative_age_is_400() {
        let app = seeded_app();
        let post = |family_id: i64, age: i64| {
            json!({
                "family_id": family_id,
                "title": "Night Nurse",
                "caregiver_type": "Elderly Care",
                "city": "Astana",
                "care_recipient_age": age
            })
        };

        let (status, _) = send(&app, "POST", "/job-posts", Some(post(99, 70))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "POST", "/job-posts", Some(post(1, -1))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn filter_by_requirements_keyword() {
        let app = seeded_app();
        let (status, body) = send(&app, "GET", "/job-posts?requirements=Soft-Spoken", None).await;
        assert_eq!(status, StatusCode::OK);
        let mut ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        ids.sort();
        assert_eq!(ids, [1, 2]);
    }

    #[tokio::test]
    async fn family_id_cannot_be_patched() {
        let app = seeded_app();
        let (status, _) = send(&app, "PATCH", "/job-posts/1", Some(json!({ "family_id": 2 }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(&app, "PATCH", "/job-posts/1", Some(json!({ "title": "Evening Nanny" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Evening Nanny");
        assert_eq!(body["family_id"], 1);
    }
}
