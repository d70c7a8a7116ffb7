//! Client-related types shared between server and client
//!
//! Common request/response types used in API communication.
//! These types are shared between vitrine-server and any Rust client.

use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Register request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username length must be between 3 and 30 chars"
    ))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 chars"
    ))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for register and login: token plus public profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information (the caller's own profile)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: String,
    pub created_at: i64,
}

/// Request an emailed password reset code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Consume a password reset code
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,

    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 chars"
    ))]
    pub new_password: String,
}

// =============================================================================
// User API DTOs
// =============================================================================

/// Minimal user reference (search results, embedded authors)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

/// Public profile as returned by GET /api/users/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: String,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: String,
    /// User ids currently following this profile
    pub followers: Vec<String>,
    /// User ids this profile follows
    pub following: Vec<String>,
    pub created_at: i64,
}

/// Profile response: the profile plus the user's posts, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: PublicProfile,
    pub posts: Vec<PostView>,
}

/// Follow toggle result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowResponse {
    /// Whether the actor follows the target after the toggle
    pub following: bool,
    pub followers_count: u64,
}

// =============================================================================
// Post API DTOs
// =============================================================================

/// Product tag as rendered to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagView {
    pub id: String,
    pub label: String,
    pub link: String,
    pub x: f64,
    pub y: f64,
    pub clicks: u32,
}

/// Tag payload inside the multipart `tags` field at post creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDraft {
    pub label: String,
    pub link: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Partial tag edit: only provided fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagEditRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Tag list after a tag mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsResponse {
    pub tags: Vec<TagView>,
}

/// Tag click result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickResponse {
    pub tag_id: String,
    pub clicks: u32,
}

/// Comment as rendered to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub author: UserSummary,
    pub text: String,
    pub created_at: i64,
}

/// Append a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// Like toggle result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub post_id: String,
    pub likes_count: u64,
    pub liked: bool,
}

/// Post as rendered to clients (feed and profile)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub author: UserSummary,
    pub image_url: String,
    #[serde(default)]
    pub caption: String,
    pub tags: Vec<TagView>,
    /// User ids that currently like this post
    pub likes: Vec<String>,
    pub comments: Vec<CommentView>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Feed pagination query (?page=N, 1-based)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    pub page: Option<u32>,
}
