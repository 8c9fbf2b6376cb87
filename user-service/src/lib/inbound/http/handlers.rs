use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::user::errors::UserError;
use crate::user::validation::ValidationErrors;

pub mod get_profile;
pub mod sign_in;
pub mod sign_up;
pub mod update_profile;

const INTERNAL_ERROR_MESSAGE: &str =
    "server encountered an error and could not process your request";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(ValidationErrors),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl ApiError {
    /// Attach the name of the operation that failed.
    pub fn at(self, location: &'static str) -> ApiFailure {
        ApiFailure {
            location,
            error: self,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidInput(errors) => ApiError::UnprocessableEntity(errors),
            UserError::DuplicateEmail(_) | UserError::InvalidCredentials => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::InvalidUserId(_) | UserError::NotFound(_) => {
                ApiError::NotFound("requested resource could not be found".to_string())
            }
            UserError::EditConflict => ApiError::Conflict(err.to_string()),
            UserError::InvalidToken(_) => {
                ApiError::Unauthorized("invalid or missing authentication token".to_string())
            }
            UserError::Password(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// An [`ApiError`] tagged with where it happened; rendered as the error
/// envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub location: &'static str,
    pub error: ApiError,
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.error.status();

        let (message, validations) = match self.error {
            ApiError::InternalServerError(cause) => {
                tracing::error!(location = self.location, error = %cause, "Request failed");
                (INTERNAL_ERROR_MESSAGE.to_string(), None)
            }
            ApiError::UnprocessableEntity(errors) => {
                ("invalid form fill".to_string(), Some(errors))
            }
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unauthorized(msg) => (msg, None),
        };

        let body = Json(ApiErrorBody {
            status: "fail",
            code: status.as_u16(),
            message,
            location: self.location,
            validations,
        });

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub status: &'static str,
    pub code: u16,
    pub message: String,
    pub location: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations: Option<ValidationErrors>,
}
