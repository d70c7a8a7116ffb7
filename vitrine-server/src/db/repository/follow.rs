//! Follow Repository
//!
//! The follow graph is a single edge set: one `follows` record per
//! (follower, followee) pair, with a unique index on `(in, out)`. A toggle
//! is one record create or delete, so the two sides of the relationship
//! can never disagree — follower and following lists are derived views of
//! the same edges.

use super::{BaseRepository, RepoResult};
use crate::db::models::UserId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct FollowRepository {
    base: BaseRepository,
}

impl FollowRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Whether actor currently follows target
    pub async fn is_following(&self, actor: &UserId, target: &UserId) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT VALUE count() FROM follows \
                 WHERE in = $actor AND out = $target GROUP ALL",
            )
            .bind(("actor", actor.clone()))
            .bind(("target", target.clone()))
            .await?;
        let counts: Vec<i64> = result.take(0)?;
        Ok(counts.first().copied().unwrap_or(0) > 0)
    }

    /// Toggle the follow edge between actor and target
    ///
    /// Returns `(following, followers_count)` after the toggle.
    pub async fn toggle(&self, actor: &UserId, target: &UserId) -> RepoResult<(bool, u64)> {
        let following = if self.is_following(actor, target).await? {
            self.base
                .db()
                .query("DELETE FROM follows WHERE in = $actor AND out = $target")
                .bind(("actor", actor.clone()))
                .bind(("target", target.clone()))
                .await?;
            false
        } else {
            self.base
                .db()
                .query("RELATE $actor->follows->$target")
                .bind(("actor", actor.clone()))
                .bind(("target", target.clone()))
                .await?;
            true
        };

        let count = self.follower_count(target).await?;
        Ok((following, count))
    }

    /// Number of followers of a user
    pub async fn follower_count(&self, user: &UserId) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE count() FROM follows WHERE out = $user GROUP ALL")
            .bind(("user", user.clone()))
            .await?;
        let counts: Vec<i64> = result.take(0)?;
        Ok(counts.first().copied().unwrap_or(0) as u64)
    }

    /// Ids of users following `user`
    pub async fn followers(&self, user: &UserId) -> RepoResult<Vec<UserId>> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE in FROM follows WHERE out = $user")
            .bind(("user", user.clone()))
            .await?;
        let ids: Vec<UserId> = result.take(0)?;
        Ok(ids)
    }

    /// Ids of users that `user` follows
    pub async fn following(&self, user: &UserId) -> RepoResult<Vec<UserId>> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE out FROM follows WHERE in = $user")
            .bind(("user", user.clone()))
            .await?;
        let ids: Vec<UserId> = result.take(0)?;
        Ok(ids)
    }
}
