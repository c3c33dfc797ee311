//! REST handlers for the authentication endpoints.
//!
//! Missing body fields are modeled as `Option` so they surface as the
//! pipeline's own validation errors (400 with a JSON body) instead of a
//! deserialization rejection.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domains::auth::actions::{register, send_otp, verify_otp};
use crate::domains::auth::errors::AuthResult;
use crate::domains::auth::models::ClientMeta;
use crate::domains::auth::types::{Role, UserSummary};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub mobile: Option<String>,
    pub role: Option<Role>,
}

#[derive(Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// POST /auth/send-otp
pub async fn send_otp_handler(
    Extension(state): Extension<AppState>,
    Extension(client): Extension<ClientMeta>,
    Json(body): Json<SendOtpRequest>,
) -> AuthResult<Json<SendOtpResponse>> {
    let mobile = body.mobile.unwrap_or_default();
    let role = body.role.unwrap_or_default();

    let issued = send_otp(&mobile, role, &client, &state.db_pool, &state.audit).await?;

    // The code leaves the server only outside production; the response
    // shape is otherwise identical for new and existing identities.
    let otp = if state.app_env.is_production() {
        None
    } else {
        tracing::debug!(otp = %issued.code, "issued OTP (development echo)");
        Some(issued.code)
    };

    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
        otp,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub mobile: Option<String>,
    pub otp: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub token: String,
    pub user: UserSummary,
    pub profile_completed: bool,
    pub redirect_to: String,
}

/// POST /auth/verify-otp
pub async fn verify_otp_handler(
    Extension(state): Extension<AppState>,
    Extension(client): Extension<ClientMeta>,
    Json(body): Json<VerifyOtpRequest>,
) -> AuthResult<Json<VerifyOtpResponse>> {
    let verified = verify_otp(
        body.mobile.as_deref().unwrap_or_default(),
        body.otp.as_deref().unwrap_or_default(),
        &client,
        &state.db_pool,
        &state.audit,
        &state.jwt_service,
    )
    .await?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        token: verified.token,
        user: verified.user,
        profile_completed: verified.profile_completed,
        redirect_to: verified.redirect_to.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub token: String,
    pub user: UserSummary,
}

/// POST /auth/register
pub async fn register_handler(
    Extension(state): Extension<AppState>,
    Extension(client): Extension<ClientMeta>,
    Json(body): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)> {
    let registered = register(
        body.mobile.as_deref().unwrap_or_default(),
        body.email.as_deref(),
        body.password.as_deref(),
        body.role.unwrap_or_default(),
        &client,
        &state.db_pool,
        &state.audit,
        &state.jwt_service,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            token: registered.token,
            user: registered.user,
        }),
    ))
}
