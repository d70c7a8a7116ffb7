//! Authentication Handlers
//!
//! Handles register, login, password reset, and current-user lookup.

use std::time::Duration;

use axum::{Json, extract::State};
use rand::Rng;
use sha2::{Digest, Sha256};
use validator::Validate;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserRole, now_millis};
use crate::db::repository::parse_record_id;
use shared::ErrorCode;

// Re-use shared DTOs for API consistency
use shared::client::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UserInfo,
};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Password reset codes stay valid for 5 minutes
pub const OTP_TTL_MS: i64 = 5 * 60 * 1000;

/// sha256 hex of a reset code; only the hash is ever stored
pub fn hash_otp(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Register handler
///
/// Creates an account and returns a JWT token plus the public profile
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let users = state.users();

    // Friendly duplicate checks; the unique indexes backstop races
    if users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailTaken));
    }
    if users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::new(ErrorCode::UsernameTaken));
    }

    let password_hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let user = users
        .create(UserCreate {
            username: req.username,
            email: req.email,
            password_hash,
            role: UserRole::User,
        })
        .await?;

    let user_id = user.id.to_string();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.role.as_str())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user_id, username = %user.username, "User registered");

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token. Unknown email
/// and wrong password produce the identical error so accounts cannot be
/// enumerated.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.users().find_by_email(&req.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.to_string();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, user.role.as_str())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user_id, username = %user.username, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Request a password reset code
///
/// Generates a 6-digit code, stores only its hash with a 5-minute expiry,
/// and mails the plaintext code. Mail failure surfaces as a 500-class
/// error; the pending reset stays stored so a retry can succeed.
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<shared::ApiResponse<()>>, AppError> {
    let user = state
        .users()
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
    let expires_at = now_millis() + OTP_TTL_MS;

    state
        .users()
        .set_reset_otp(&user.id, hash_otp(&code), expires_at)
        .await?;

    state
        .mailer
        .send(
            &user.email,
            "Your Vitrine password reset code",
            &format!("Your password reset code is {code}. It expires in 5 minutes."),
        )
        .await?;

    tracing::info!(user_id = %user.id, "Password reset code issued");

    Ok(Json(shared::ApiResponse::ok()))
}

/// Consume a password reset code
///
/// The code is single use: success clears the pending reset, so a second
/// attempt with the same code fails with `NoPendingReset`.
pub async fn reset_password(
    State(state): State<ServerState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<shared::ApiResponse<()>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = state
        .users()
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let (Some(stored_hash), Some(expires_at)) =
        (user.reset_otp_hash.clone(), user.reset_otp_expires_at)
    else {
        return Err(AppError::new(ErrorCode::NoPendingReset));
    };

    if now_millis() > expires_at {
        return Err(AppError::new(ErrorCode::OtpExpired));
    }

    if hash_otp(&req.code) != stored_hash {
        return Err(AppError::new(ErrorCode::OtpInvalid));
    }

    let password_hash = User::hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    state.users().complete_reset(&user.id, password_hash).await?;

    tracing::info!(user_id = %user.id, "Password reset completed");

    Ok(Json(shared::ApiResponse::ok()))
}

/// Get current user info
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<UserInfo>, AppError> {
    let id = parse_record_id("user", &user.id)?;
    let user = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(user.into()))
}
