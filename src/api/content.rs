use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{AppState, error::ApiError, extract::JsonBody};
use crate::auth::UserContext;
use crate::validation::{content_from_parts, content_id_from_part};

#[derive(Debug, Deserialize)]
pub struct AddContentRequest {
    #[serde(rename = "type")]
    kind: Option<String>,
    link: Option<String>,
    title: Option<String>,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContentRequest {
    content_id: Option<String>,
}

pub async fn add_content(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    JsonBody(payload): JsonBody<AddContentRequest>,
) -> Result<Json<Value>, ApiError> {
    let data = content_from_parts(payload.kind, payload.link, payload.title, payload.tags)?;
    let id = state.add_content(user.user_id(), &data).await?;

    Ok(Json(json!({
        "message": "Content added",
        "id": id,
    })))
}

pub async fn list_content(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<Value>, ApiError> {
    let content = state.list_content(user.user_id()).await?;

    Ok(Json(json!({
        "message": format!("Found {} content items", content.len()),
        "Content": content,
    })))
}

pub async fn delete_content(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    JsonBody(payload): JsonBody<DeleteContentRequest>,
) -> Result<Json<Value>, ApiError> {
    let content_id = content_id_from_part(payload.content_id)?;
    state.delete_content(user.user_id(), &content_id).await?;

    Ok(Json(json!({ "message": "Content deleted" })))
}
