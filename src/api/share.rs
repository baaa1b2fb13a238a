use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{AppState, error::ApiError, extract::JsonBody};
use crate::auth::UserContext;
use crate::brain::SharedBrain;
use crate::error::BrainError;
use crate::types::ShareToken;

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    share: Option<Value>,
}

/// Lenient boolean: `true`, `"true"` and `"True"` enable sharing, anything
/// else disables it.
pub fn share_requested(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "True",
        _ => false,
    }
}

pub async fn update_sharing(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    JsonBody(payload): JsonBody<ShareRequest>,
) -> Result<Json<Value>, ApiError> {
    let share = payload
        .share
        .ok_or_else(|| BrainError::MissingFields("share is required".to_string()))?;

    if share_requested(&share) {
        let hash = state.enable_sharing(user.user_id()).await?;
        Ok(Json(json!({
            "message": "Share link enabled",
            "hash": hash,
        })))
    } else {
        state.disable_sharing(user.user_id()).await?;
        Ok(Json(json!({ "message": "Share link disabled" })))
    }
}

pub async fn shared_brain(
    State(state): State<AppState>,
    Path(share_link): Path<String>,
) -> Result<Json<SharedBrain>, ApiError> {
    let brain = state.shared_brain(&ShareToken::new(share_link)).await?;
    Ok(Json(brain))
}
