use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiFailure;
use super::ApiSuccess;
use crate::domain::user::models::SignInForm;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::router::AppState;

pub async fn sign_in(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignInRequest>,
) -> Result<ApiSuccess<SignInResponseData>, ApiFailure> {
    let access_token = state
        .user_service
        .sign_in(SignInForm {
            email: body.email,
            password: body.password,
        })
        .await
        .map_err(|e| ApiError::from(e).at("User login"))?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        SignInResponseData { access_token },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignInRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponseData {
    pub access_token: String,
}
