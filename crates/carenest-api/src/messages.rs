use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use carenest_db::models::NewMessage;
use carenest_db::validation::require_party;
use carenest_types::api::{MessageFilter, SendMessageRequest, UpdateMessageRequest};
use carenest_types::models::Message;

use crate::error::ApiResult;
use crate::{AppState, run_blocking};

pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let new = NewMessage {
        sender: require_party("sender", req.sender)?,
        receiver: require_party("receiver", req.receiver)?,
        content: req.content,
    };
    let message = run_blocking(&state, move |db| db.send_message(new)).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Query(filter): Query<MessageFilter>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = run_blocking(&state, move |db| db.list_messages(&filter)).await?;
    Ok(Json(messages))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Message>> {
    let message = run_blocking(&state, move |db| db.get_message(id)).await?;
    Ok(Json(message))
}

pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMessageRequest>,
) -> ApiResult<Json<Message>> {
    let message = run_blocking(&state, move |db| db.update_message(id, req.content)).await?;
    Ok(Json(message))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    run_blocking(&state, move |db| db.delete_message(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::testing::{seeded_app, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn send_between_parties() {
        let app = seeded_app();
        let (status, body) = send(
            &app,
            "POST",
            "/messages",
            Some(json!({
                "sender": { "kind": "caregiver", "id": 4 },
                "receiver": { "kind": "family", "id": 3 },
                "content": "Happy to help on weekends."
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["sender"], json!({ "kind": "caregiver", "id": 4 }));

        let (_, body) = send(&app, "GET", "/messages?family_id=3", None).await;
        let ids: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, [2, 3]);
    }

    #[tokio::test]
    async fn missing_receiver_is_400() {
        let app = seeded_app();
        let (status, body) = send(
            &app,
            "POST",
            "/messages",
            Some(json!({
                "sender": { "kind": "family", "id": 1 },
                "content": "Anyone there?"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "receiver is required");
    }

    #[tokio::test]
    async fn unknown_party_is_404() {
        let app = seeded_app();
        let (status, _) = send(
            &app,
            "POST",
            "/messages",
            Some(json!({
                "sender": { "kind": "family", "id": 1 },
                "receiver": { "kind": "caregiver", "id": 77 },
                "content": "Hello"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_and_delete() {
        let app = seeded_app();

        let (status, body) = send(&app, "PATCH", "/messages/2", Some(json!({ "content": "See you Saturday." }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "See you Saturday.");

        let (status, _) = send(&app, "DELETE", "/messages/2", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", "/messages/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
