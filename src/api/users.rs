use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{AppState, error::ApiError, extract::JsonBody};
use crate::validation::Credentials;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    username: Option<String>,
    password: Option<String>,
}

pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let creds = Credentials::from_parts(payload.username, payload.password)?;
    state.signup(&creds).await?;

    Ok(Json(json!({
        "message": format!("Signup successful with user: {}", creds.username()),
    })))
}

pub async fn signin(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let creds = Credentials::from_parts(payload.username, payload.password)?;
    let token = state.signin(&creds).await?;

    Ok(Json(json!({
        "message": "Signin successful",
        "token": token,
    })))
}
