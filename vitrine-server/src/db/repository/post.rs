//! Post Repository
//!
//! Posts are single documents; every mutation here is one document-level
//! write. Concurrent toggles resolve last-write-wins at the store.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Comment, Post, PostCreate, PostId, Tag, UserId, now_millis};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PostRepository {
    base: BaseRepository,
}

impl PostRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find post by id
    pub async fn find_by_id(&self, id: &PostId) -> RepoResult<Option<Post>> {
        let post: Option<Post> = self.base.db().select(id.clone()).await?;
        Ok(post)
    }

    /// Create a new post
    pub async fn create(&self, data: PostCreate) -> RepoResult<Post> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                "CREATE post CONTENT {
                    author: $author,
                    image_url: $image_url,
                    caption: $caption,
                    tags: $tags,
                    likes: [],
                    comments: [],
                    created_at: $now,
                    updated_at: $now
                }",
            )
            .bind(("author", data.author))
            .bind(("image_url", data.image_url))
            .bind(("caption", data.caption))
            .bind(("tags", data.tags))
            .bind(("now", now))
            .await?;

        let created: Vec<Post> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create post".to_string()))
    }

    /// Feed page, newest first (1-based page, skip/limit)
    ///
    /// Secondary sort on id keeps pages stable when several posts share a
    /// creation timestamp.
    pub async fn page(&self, page: u32, page_size: u32) -> RepoResult<Vec<Post>> {
        let start = i64::from(page.saturating_sub(1)) * i64::from(page_size);
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM post ORDER BY created_at DESC, id DESC \
                 LIMIT $limit START $start",
            )
            .bind(("limit", i64::from(page_size)))
            .bind(("start", start))
            .await?;
        let posts: Vec<Post> = result.take(0)?;
        Ok(posts)
    }

    /// All posts by an author, newest first
    pub async fn by_author(&self, author: &UserId) -> RepoResult<Vec<Post>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM post WHERE author = $author ORDER BY created_at DESC, id DESC")
            .bind(("author", author.clone()))
            .await?;
        let posts: Vec<Post> = result.take(0)?;
        Ok(posts)
    }

    /// Toggle a user's like on a post
    ///
    /// Returns `(liked, likes_count)` after the toggle.
    pub async fn toggle_like(&self, id: &PostId, user: &UserId) -> RepoResult<(bool, u64)> {
        let post = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Post {id} not found")))?;

        let mut likes = post.likes;
        let liked = if let Some(pos) = likes.iter().position(|u| u == user) {
            likes.remove(pos);
            false
        } else {
            likes.push(user.clone());
            true
        };
        let count = likes.len() as u64;

        self.base
            .db()
            .query("UPDATE $id SET likes = $likes, updated_at = $now")
            .bind(("id", id.clone()))
            .bind(("likes", likes))
            .bind(("now", now_millis()))
            .await?;

        Ok((liked, count))
    }

    /// Append a comment; returns the full updated comment sequence
    pub async fn append_comment(&self, id: &PostId, comment: Comment) -> RepoResult<Vec<Comment>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET comments += $comment, updated_at = $now RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("comment", comment))
            .bind(("now", now_millis()))
            .await?;

        let updated: Vec<Post> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .map(|p| p.comments)
            .ok_or_else(|| RepoError::NotFound(format!("Post {id} not found")))
    }

    /// Replace the post's tag list (tag edits, deletes, click increments)
    pub async fn save_tags(&self, id: &PostId, tags: Vec<Tag>) -> RepoResult<Vec<Tag>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET tags = $tags, updated_at = $now RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("tags", tags))
            .bind(("now", now_millis()))
            .await?;

        let updated: Vec<Post> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .map(|p| p.tags)
            .ok_or_else(|| RepoError::NotFound(format!("Post {id} not found")))
    }

    /// Hard delete a post
    pub async fn delete(&self, id: &PostId) -> RepoResult<bool> {
        self.base
            .db()
            .query("DELETE $id")
            .bind(("id", id.clone()))
            .await?;
        Ok(true)
    }
}
