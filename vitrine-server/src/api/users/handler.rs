//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::convert;
use crate::api::posts::render_posts;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::parse_record_id;
use crate::utils::{AppError, ErrorCode};
use shared::client::{FollowResponse, ProfileResponse, PublicProfile, UserSummary};

/// PUT /api/users/:id/follow - 关注 / 取关
///
/// 关注边是单条记录：切换即单次原子写，两侧视图不可能失配。
pub async fn toggle_follow(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<FollowResponse>, AppError> {
    let target_id = parse_record_id("user", &id)?;
    let actor_id = parse_record_id("user", &user.id)?;

    if target_id == actor_id {
        return Err(AppError::new(ErrorCode::SelfFollow));
    }

    // Target must exist
    state
        .users()
        .find_by_id(&target_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let (following, followers_count) = state.follows().toggle(&actor_id, &target_id).await?;

    tracing::info!(
        actor = %actor_id,
        target = %target_id,
        following = following,
        "Follow toggled"
    );

    Ok(Json(FollowResponse {
        following,
        followers_count,
    }))
}

/// GET /api/users/:id - 用户主页 (公开资料 + 帖子)
pub async fn profile(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = parse_record_id("user", &id)?;

    let user = state
        .users()
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let follows = state.follows();
    let followers = follows.followers(&user_id).await?;
    let following = follows.following(&user_id).await?;

    let posts = state.posts().by_author(&user_id).await?;
    let posts = render_posts(&state, posts).await?;

    Ok(Json(ProfileResponse {
        user: PublicProfile {
            id: convert::record_id_to_string(&user.id),
            username: user.username,
            role: user.role.to_string(),
            bio: user.bio,
            avatar_url: user.avatar_url,
            followers: followers.iter().map(convert::record_id_to_string).collect(),
            following: following.iter().map(convert::record_id_to_string).collect(),
            created_at: user.created_at,
        },
        posts,
    }))
}

/// GET /api/users/search/:query - 用户名搜索 (不区分大小写，最多 10 条)
pub async fn search(
    State(state): State<ServerState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let rows = state.users().search(&query).await?;

    Ok(Json(
        rows.into_iter()
            .map(|row| UserSummary {
                id: row.id.to_string(),
                username: row.username,
            })
            .collect(),
    ))
}
