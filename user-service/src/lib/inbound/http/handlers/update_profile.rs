use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::get_profile::ProfileResponseData;
use super::ApiError;
use super::ApiFailure;
use super::ApiSuccess;
use crate::domain::user::models::UpdateProfileForm;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::extract::JsonBody;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for updating a profile (raw JSON)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileForm {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        }
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiFailure> {
    let located = |e: UserError| ApiError::from(e).at("User update");

    let user_id = UserId::from_string(&id)
        .map_err(UserError::from)
        .map_err(located)?;

    tracing::debug!(
        user_id = %user_id,
        caller = %caller.email,
        token_expires_at = caller.expires_at,
        "Profile update requested"
    );

    state
        .user_service
        .update_profile(&user_id, req.into())
        .await
        .map_err(located)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}
