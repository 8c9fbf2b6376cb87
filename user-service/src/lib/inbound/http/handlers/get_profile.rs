use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiFailure;
use super::ApiSuccess;
use crate::domain::user::models::ProfileView;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiFailure> {
    let located = |e: UserError| ApiError::from(e).at("User profile");

    let user_id = UserId::from_string(&user_id)
        .map_err(UserError::from)
        .map_err(located)?;

    state
        .user_service
        .get_profile(&user_id)
        .await
        .map_err(located)
        .map(|profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

/// Public profile as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponseData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<ProfileView> for ProfileResponseData {
    fn from(profile: ProfileView) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
        }
    }
}
