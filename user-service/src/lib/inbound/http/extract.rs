use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::http::StatusCode;

use super::handlers::ApiError;
use super::handlers::ApiFailure;

/// Request bodies larger than this are refused.
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// [`axum::Json`] whose rejections use the service's error envelope.
///
/// Request types pair it with `#[serde(deny_unknown_fields)]` so stray keys
/// are reported instead of silently dropped.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(inner)) => Ok(JsonBody(inner)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected request body");
                Err(ApiError::BadRequest(rejection_message(rejection)).at("Request body"))
            }
        }
    }
}

fn rejection_message(rejection: JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(e) => e.body_text(),
        JsonRejection::JsonSyntaxError(_) => "body contains badly-formed JSON".to_string(),
        JsonRejection::MissingJsonContentType(_) => {
            "request must have `Content-Type: application/json`".to_string()
        }
        JsonRejection::BytesRejection(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            format!("body must not be larger than {} bytes", MAX_BODY_BYTES)
        }
        other => other.body_text(),
    }
}
