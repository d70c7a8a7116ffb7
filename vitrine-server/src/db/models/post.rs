//! Post Model
//!
//! Posts embed their tags and comments as ordered arrays; likes are a set
//! of user record ids. Tags carry a stable generated id so that edits,
//! deletes and click tracking survive reordering and deletion of earlier
//! tags.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use uuid::Uuid;

use super::UserId;

/// Post ID type
pub type PostId = RecordId;

/// Product tag overlaid on a post image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Stable id, generated at creation; addressing key for all tag ops
    pub id: String,
    pub label: String,
    pub link: String,
    /// Percentage coordinates on the image, clamped to 0..=100
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub clicks: u32,
}

impl Tag {
    /// Build a tag from creation input, assigning a fresh stable id
    pub fn new(label: String, link: String, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            label,
            link,
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
            clicks: 0,
        }
    }
}

/// Embedded comment (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author: UserId,
    pub text: String,
    pub created_at: i64,
}

/// Post model matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: UserId,
    pub image_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub likes: Vec<UserId>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Post {
    /// Position of a tag by its stable id
    pub fn tag_index(&self, tag_id: &str) -> Option<usize> {
        self.tags.iter().position(|t| t.id == tag_id)
    }
}

/// Create post payload
#[derive(Debug, Clone)]
pub struct PostCreate {
    pub author: UserId,
    pub image_url: String,
    pub caption: String,
    pub tags: Vec<Tag>,
}
