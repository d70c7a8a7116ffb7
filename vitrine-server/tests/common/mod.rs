//! Shared test fixtures
//!
//! Builds a [`ServerState`] against an in-memory SurrealDB, a tempdir
//! asset store and the log-only mailer, so the handler functions can be
//! exercised directly without an HTTP stack.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use shared::client::{RegisterRequest, TagDraft};
use shared::{AppError, ErrorCode};
use vitrine_server::api::posts::{ImagePart, create_post_inner};
use vitrine_server::auth::{CurrentUser, JwtConfig, JwtService};
use vitrine_server::core::{Config, ServerState};
use vitrine_server::db::DbService;
use vitrine_server::services::{LocalAssetStore, TracingMailer};

pub struct TestContext {
    pub state: ServerState,
    // Keeps the images dir alive for the duration of the test
    pub tmp: tempfile::TempDir,
}

/// Fresh server state on an in-memory database
pub async fn test_state() -> TestContext {
    let tmp = tempfile::tempdir().unwrap();
    let db = DbService::connect_memory().await.unwrap();

    let mut config = Config::with_overrides(tmp.path().to_str().unwrap(), 0);
    config.jwt = JwtConfig {
        secret: "test-secret-key-at-least-32-chars-long!".to_string(),
        expiration_minutes: 60,
        issuer: "vitrine-server".to_string(),
        audience: "vitrine-clients".to_string(),
    };

    let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
    let asset_store = Arc::new(LocalAssetStore::new(tmp.path().join("images"), "").unwrap());

    let state = ServerState::new(
        config,
        db.db,
        jwt_service,
        asset_store,
        Arc::new(TracingMailer),
    );

    TestContext { state, tmp }
}

/// Register a user and return the acting identity the way the auth
/// middleware would provide it
pub async fn register_user(state: &ServerState, username: &str) -> CurrentUser {
    let response = vitrine_server::api::auth::register(
        State(state.clone()),
        Json(RegisterRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "secret123".to_string(),
        }),
    )
    .await
    .expect("registration failed")
    .0;

    CurrentUser {
        id: response.user.id,
        username: response.user.username,
        role: response.user.role,
    }
}

/// An admin identity, as its JWT claims would present it
pub fn as_admin(user: &CurrentUser) -> CurrentUser {
    CurrentUser {
        id: user.id.clone(),
        username: user.username.clone(),
        role: "admin".to_string(),
    }
}

/// Tiny valid PNG for post creation
pub fn png_bytes(seed: u8) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([seed, 80, 160]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub fn image_part(seed: u8) -> Option<ImagePart> {
    Some(ImagePart {
        data: png_bytes(seed),
        content_type: Some("image/png".to_string()),
    })
}

pub fn tag_draft(label: &str, link: &str) -> TagDraft {
    TagDraft {
        label: label.to_string(),
        link: link.to_string(),
        x: 25.0,
        y: 75.0,
    }
}

/// Create a post through the handler path, returning its API view
pub async fn create_post(
    state: &ServerState,
    user: &CurrentUser,
    caption: &str,
    drafts: Vec<TagDraft>,
) -> shared::client::PostView {
    create_post_inner(
        state.clone(),
        user.clone(),
        image_part(7),
        caption.to_string(),
        drafts,
    )
    .await
    .expect("post creation failed")
    .0
}

pub fn assert_code(err: AppError, expected: ErrorCode) {
    assert_eq!(err.code, expected, "unexpected error: {}", err.message);
}
