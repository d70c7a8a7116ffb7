//! 类型转换模块
//!
//! 将数据库模型 (db::models) 转换为 API 响应模型 (shared::client)。
//! RecordId 在 API 边界统一序列化为 "table:id" 字符串。

use std::collections::HashMap;

use crate::db::models as db;
use shared::client as api;
use surrealdb::RecordId;

// ============ Helper ============

pub fn record_id_to_string(id: &RecordId) -> String {
    id.to_string()
}

/// Username lookup map keyed by "table:id" strings
pub type UsernameMap = HashMap<String, String>;

fn summary(id: &RecordId, usernames: &UsernameMap) -> api::UserSummary {
    let id = record_id_to_string(id);
    let username = usernames.get(&id).cloned().unwrap_or_default();
    api::UserSummary { id, username }
}

// ============ Tag ============

impl From<db::Tag> for api::TagView {
    fn from(t: db::Tag) -> Self {
        Self {
            id: t.id,
            label: t.label,
            link: t.link,
            x: t.x,
            y: t.y,
            clicks: t.clicks,
        }
    }
}

pub fn tags_to_views(tags: Vec<db::Tag>) -> Vec<api::TagView> {
    tags.into_iter().map(Into::into).collect()
}

// ============ Comment ============

pub fn comment_to_view(c: db::Comment, usernames: &UsernameMap) -> api::CommentView {
    api::CommentView {
        author: summary(&c.author, usernames),
        text: c.text,
        created_at: c.created_at,
    }
}

// ============ Post ============

/// Render a post with its author and comment-author usernames resolved
pub fn post_to_view(p: db::Post, usernames: &UsernameMap) -> api::PostView {
    api::PostView {
        id: record_id_to_string(&p.id),
        author: summary(&p.author, usernames),
        image_url: p.image_url,
        caption: p.caption,
        tags: tags_to_views(p.tags),
        likes: p.likes.iter().map(record_id_to_string).collect(),
        comments: p
            .comments
            .into_iter()
            .map(|c| comment_to_view(c, usernames))
            .collect(),
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

/// Collect every user id a post list references (authors + comment authors)
pub fn referenced_user_ids(posts: &[db::Post]) -> Vec<RecordId> {
    let mut seen = std::collections::HashSet::new();
    let mut ids = Vec::new();
    for post in posts {
        for id in std::iter::once(&post.author).chain(post.comments.iter().map(|c| &c.author)) {
            if seen.insert(record_id_to_string(id)) {
                ids.push(id.clone());
            }
        }
    }
    ids
}

// ============ User ============

impl From<db::User> for api::UserInfo {
    fn from(u: db::User) -> Self {
        Self {
            id: record_id_to_string(&u.id),
            username: u.username,
            email: u.email,
            role: u.role.to_string(),
            bio: u.bio,
            avatar_url: u.avatar_url,
            created_at: u.created_at,
        }
    }
}
