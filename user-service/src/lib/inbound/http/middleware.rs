use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use super::handlers::ApiFailure;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

const LOCATION: &str = "Authentication";

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
    pub expires_at: i64,
}

/// Middleware that validates bearer tokens and adds the caller to request
/// extensions.
///
/// A missing, malformed, forged or expired token, or one naming a user that no
/// longer exists, is a 401. Only a failing user lookup is a 500. Every response,
/// rejections included, carries `Vary: Authorization`.
pub async fn authenticate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let mut response = match authorize_request(&state, req).await {
        Ok(req) => next.run(req).await,
        Err(failure) => failure.into_response(),
    };

    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));
    response
}

async fn authorize_request(state: &AppState, mut req: Request) -> Result<Request, ApiFailure> {
    let token = extract_token_from_header(&req)?;

    let claims = state
        .user_service
        .authorize(token)
        .await
        .map_err(|e| {
            if let UserError::InvalidToken(reason) = &e {
                tracing::warn!(reason = %reason, "Bearer token rejected");
            }
            ApiError::from(e).at(LOCATION)
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        email: claims.email,
        expires_at: claims.exp,
    });

    Ok(req)
}

fn unauthorized() -> ApiFailure {
    ApiError::Unauthorized("invalid or missing authentication token".to_string()).at(LOCATION)
}

/// Accept exactly `Bearer <token>` with a non-empty token.
fn extract_token_from_header(req: &Request) -> Result<&str, ApiFailure> {
    let auth_str = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(unauthorized)?
        .to_str()
        .map_err(|_| unauthorized())?;

    match auth_str.split(' ').collect::<Vec<_>>().as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(*token),
        _ => Err(unauthorized()),
    }
}
