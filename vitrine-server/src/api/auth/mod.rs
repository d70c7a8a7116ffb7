//! Authentication Routes

mod handler;

pub use handler::{OTP_TTL_MS, hash_otp};

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - register/login/forgot-password/reset-password: public (listed in
///   the auth middleware's public routes)
/// - /api/auth/me: requires authentication (global require_auth middleware)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/forgot-password", post(handler::forgot_password))
        .route("/api/auth/reset-password", post(handler::reset_password))
        .route("/api/auth/me", get(handler::me))
}

// Handler fns are exercised directly by the integration tests
pub use handler::{forgot_password, login, me, register, reset_password};
