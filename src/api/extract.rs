//! JSON body extractor whose rejections go through [`ApiError`].

use axum::{
    Json,
    body::Body,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::error::BrainError;

/// Same cap axum applies to `Json` by default.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Like [`Json`], but an absent or blank body reads as `{}` so that
/// required-field checks answer instead of a body-format rejection.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| BrainError::Validation(vec![format!("Failed to read request body: {}", e)]))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            let empty = serde_json::from_slice(b"{}")
                .map_err(|e| BrainError::Validation(vec![e.to_string()]))?;
            return Ok(Self(empty));
        }

        let req = Request::from_parts(parts, Body::from(bytes));
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
