use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::AuthError;
use crate::validation::validate_user;

/// POST /api/auth/login - credential pass-through to the auth provider
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let email = payload.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = payload.get("password").and_then(Value::as_str).unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let session = match state.auth.sign_in(email, password).await {
        Ok(session) => session,
        Err(AuthError::Rejected(message)) => return Err(ApiError::unauthorized(message)),
        Err(err) => return Err(ApiError::upstream(err, "Server error")),
    };

    Ok(Json(json!({
        "message": "Login successful",
        "user": session.user,
        "token": session.access_token,
    })))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate_user(&payload)?;
    let name = payload.get("name").and_then(Value::as_str).unwrap_or_default();
    let email = payload.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = payload.get("password").and_then(Value::as_str).unwrap_or_default();

    let session = match state.auth.sign_up(name, email, password).await {
        Ok(session) => session,
        Err(AuthError::Rejected(message)) => return Err(ApiError::bad_request(message)),
        Err(err) => return Err(ApiError::upstream(err, "Server error")),
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": session.user,
            "token": session.access_token,
        })),
    ))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .auth
        .sign_out()
        .await
        .map_err(|e| ApiError::upstream(e, "Server error"))?;
    Ok(Json(json!({ "message": "Logout successful" })))
}
