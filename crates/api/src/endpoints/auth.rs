//! Account endpoints: registration, activation, login, password reset.

use axum::{Json, Router, extract::State, routing::post};
use reelboard_common::AppResult;
use reelboard_core::{
    ActivateInput, CompleteResetInput, LoginInput, RegisterInput, RequestResetInput,
};
use serde::Serialize;

use crate::{
    middleware::AppState,
    response::{ApiResponse, OkResponse},
};

/// Registered account response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub is_active: bool,
}

/// Register a new account.
///
/// The account starts inactive; the activation code is emailed.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let user = state.account_service.register(input).await?;

    Ok(ApiResponse::ok(RegisterResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        is_active: user.is_active,
    }))
}

/// Activation response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateResponse {
    pub id: String,
    pub is_active: bool,
}

/// Activate an account with the emailed code.
async fn activate(
    State(state): State<AppState>,
    Json(input): Json<ActivateInput>,
) -> AppResult<ApiResponse<ActivateResponse>> {
    let user = state.account_service.activate(input).await?;

    Ok(ApiResponse::ok(ActivateResponse {
        id: user.id,
        is_active: user.is_active,
    }))
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub token: String,
}

/// Log in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (user, token) = state.account_service.login(input).await?;

    Ok(ApiResponse::ok(LoginResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        token,
    }))
}

/// Request a password reset code by email.
async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<RequestResetInput>,
) -> AppResult<ApiResponse<OkResponse>> {
    state.account_service.request_reset(input).await?;

    Ok(ApiResponse::ok(OkResponse { ok: true }))
}

/// Complete a password reset with the emailed code.
async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<CompleteResetInput>,
) -> AppResult<ApiResponse<OkResponse>> {
    state.account_service.complete_reset(input).await?;

    Ok(ApiResponse::ok(OkResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/activate", post(activate))
        .route("/login", post(login))
        .route("/password/forgot", post(forgot_password))
        .route("/password/reset", post(reset_password))
}
