use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiFailure;
use super::ApiSuccess;
use crate::domain::user::models::SignUpForm;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::router::AppState;

const LOCATION: &str = "User signup";

pub async fn sign_up(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignUpRequest>,
) -> Result<ApiSuccess<SignUpResponseData>, ApiFailure> {
    state
        .user_service
        .sign_up(body.into())
        .await
        .map_err(|e| super::ApiError::from(e).at(LOCATION))
        .map(|id| ApiSuccess::new(StatusCode::OK, SignUpResponseData { user_id: id.0 }))
}

/// HTTP request body for signing up (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignUpRequest {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl From<SignUpRequest> for SignUpForm {
    fn from(req: SignUpRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponseData {
    pub user_id: i64,
}
