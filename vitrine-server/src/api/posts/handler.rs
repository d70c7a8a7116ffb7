//! Post API Handlers
//!
//! Feed, multipart post creation, likes, comments, tag operations and
//! deletion. Tag edit/delete require ownership; click tracking only
//! requires authentication; deletion allows the author or an admin.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};

use crate::api::convert;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Comment, Post, PostCreate, Tag, now_millis};
use crate::db::repository::parse_record_id;
use crate::utils::validation::{
    MAX_CAPTION_LEN, MAX_COMMENT_LEN, validate_required_text, validate_tag_label,
    validate_tag_link,
};
use crate::utils::{AppError, ErrorCode};
use shared::ApiResponse;
use shared::client::{
    ClickResponse, CommentRequest, FeedParams, LikeResponse, PostView, TagDraft, TagEditRequest,
    TagsResponse,
};

/// Feed page size
const FEED_PAGE_SIZE: u32 = 10;

/// GET /api/posts?page=N - 信息流 (最新在前)
pub async fn feed(
    State(state): State<ServerState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Vec<PostView>>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let posts = state.posts().page(page, FEED_PAGE_SIZE).await?;
    let views = render_posts(&state, posts).await?;
    Ok(Json(views))
}

/// Resolve usernames referenced by a post list and render API views
pub(crate) async fn render_posts(
    state: &ServerState,
    posts: Vec<Post>,
) -> Result<Vec<PostView>, AppError> {
    let ids = convert::referenced_user_ids(&posts);
    let usernames: convert::UsernameMap = state
        .users()
        .summaries(ids)
        .await?
        .into_iter()
        .map(|row| (row.id.to_string(), row.username))
        .collect();

    Ok(posts
        .into_iter()
        .map(|p| convert::post_to_view(p, &usernames))
        .collect())
}

/// Image part of the multipart create-post request
pub struct ImagePart {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

/// POST /api/posts - 发帖 (multipart: image + caption + tags)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<PostView>, AppError> {
    let mut image: Option<ImagePart> = None;
    let mut caption = String::new();
    let mut drafts: Vec<TagDraft> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_request(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                // Prefer the declared content type; fall back to the filename
                let content_type = field.content_type().map(|ct| ct.to_string()).or_else(|| {
                    field
                        .file_name()
                        .and_then(|name| mime_guess::from_path(name).first())
                        .map(|mime| mime.to_string())
                });
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::invalid_request(format!("Failed to read image: {e}")))?
                    .to_vec();
                image = Some(ImagePart { data, content_type });
            }
            Some("caption") => {
                caption = field
                    .text()
                    .await
                    .map_err(|e| AppError::invalid_request(format!("Failed to read caption: {e}")))?;
            }
            Some("tags") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::invalid_request(format!("Failed to read tags: {e}")))?;
                drafts = serde_json::from_str(&raw)
                    .map_err(|e| AppError::invalid_request(format!("Invalid tags JSON: {e}")))?;
            }
            _ => {}
        }
    }

    create_post_inner(state, user, image, caption, drafts).await
}

/// Post creation, separated from multipart parsing
///
/// The image is stored FIRST; the post record is only created once asset
/// storage succeeded, so upload failure cannot orphan a post. If record
/// creation fails afterwards the stored asset is removed best-effort.
pub async fn create_post_inner(
    state: ServerState,
    user: CurrentUser,
    image: Option<ImagePart>,
    caption: String,
    drafts: Vec<TagDraft>,
) -> Result<Json<PostView>, AppError> {
    let image = image.ok_or_else(|| AppError::new(ErrorCode::ImageMissing))?;

    if caption.len() > MAX_CAPTION_LEN {
        return Err(AppError::validation(format!(
            "Caption is too long (max {MAX_CAPTION_LEN} chars)"
        )));
    }

    // Same validation routine as tag edit
    let mut tags = Vec::with_capacity(drafts.len());
    for draft in drafts {
        validate_tag_label(&draft.label)?;
        validate_tag_link(&draft.link)?;
        tags.push(Tag::new(draft.label, draft.link, draft.x, draft.y));
    }

    let author = parse_record_id("user", &user.id)?;

    let image_url = state
        .asset_store
        .store(image.data, image.content_type.as_deref())
        .await?;

    let created = state
        .posts()
        .create(PostCreate {
            author,
            image_url: image_url.clone(),
            caption,
            tags,
        })
        .await;

    let post = match created {
        Ok(post) => post,
        Err(e) => {
            // Best-effort rollback of the stored asset
            if let Err(cleanup) = state.asset_store.delete(&image_url).await {
                tracing::warn!(url = %image_url, error = %cleanup, "Failed to clean up asset");
            }
            return Err(e.into());
        }
    };

    tracing::info!(post_id = %post.id, author = %user.id, "Post created");

    let usernames =
        convert::UsernameMap::from([(user.id.clone(), user.username.clone())]);
    Ok(Json(convert::post_to_view(post, &usernames)))
}

/// PUT /api/posts/:id/like - 点赞 / 取消点赞
pub async fn toggle_like(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    let post_id = parse_record_id("post", &id)?;
    let actor = parse_record_id("user", &user.id)?;

    let (liked, likes_count) = state
        .posts()
        .toggle_like(&post_id, &actor)
        .await
        .map_err(not_found_as_post)?;

    Ok(Json(LikeResponse {
        post_id: post_id.to_string(),
        likes_count,
        liked,
    }))
}

/// POST /api/posts/:id/comment - 追加评论
pub async fn add_comment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<Vec<shared::client::CommentView>>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::new(ErrorCode::CommentEmpty));
    }
    validate_required_text(&req.text, "comment", MAX_COMMENT_LEN)?;

    let post_id = parse_record_id("post", &id)?;
    let author = parse_record_id("user", &user.id)?;

    let comments = state
        .posts()
        .append_comment(
            &post_id,
            Comment {
                author,
                text: req.text,
                created_at: now_millis(),
            },
        )
        .await
        .map_err(not_found_as_post)?;

    // Resolve comment author usernames
    let mut seen = std::collections::HashSet::new();
    let ids: Vec<_> = comments
        .iter()
        .map(|c| c.author.clone())
        .filter(|id| seen.insert(id.to_string()))
        .collect();
    let usernames: convert::UsernameMap = state
        .users()
        .summaries(ids)
        .await?
        .into_iter()
        .map(|row| (row.id.to_string(), row.username))
        .collect();

    Ok(Json(
        comments
            .into_iter()
            .map(|c| convert::comment_to_view(c, &usernames))
            .collect(),
    ))
}

/// PUT /api/posts/:postId/tags/:tagId/click - 记录标签点击
///
/// 无所有权检查：任何已登录用户的点击都计入统计。
pub async fn click_tag(
    State(state): State<ServerState>,
    Path((post_id, tag_id)): Path<(String, String)>,
) -> Result<Json<ClickResponse>, AppError> {
    let post_id = parse_record_id("post", &post_id)?;
    let post = fetch_post(&state, &post_id).await?;

    let index = post
        .tag_index(&tag_id)
        .ok_or_else(|| AppError::new(ErrorCode::TagNotFound))?;

    let mut tags = post.tags;
    tags[index].clicks += 1;
    let clicks = tags[index].clicks;

    state
        .posts()
        .save_tags(&post_id, tags)
        .await
        .map_err(not_found_as_post)?;

    Ok(Json(ClickResponse { tag_id, clicks }))
}

/// PUT /api/posts/:postId/tags/:tagId - 编辑标签 (仅作者)
pub async fn edit_tag(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((post_id, tag_id)): Path<(String, String)>,
    Json(req): Json<TagEditRequest>,
) -> Result<Json<TagsResponse>, AppError> {
    let post_id = parse_record_id("post", &post_id)?;
    let post = fetch_post(&state, &post_id).await?;
    require_owner(&post, &user)?;

    let index = post
        .tag_index(&tag_id)
        .ok_or_else(|| AppError::new(ErrorCode::TagNotFound))?;

    // Same validation routine as creation; only provided fields change
    if let Some(ref label) = req.label {
        validate_tag_label(label)?;
    }
    if let Some(ref link) = req.link {
        validate_tag_link(link)?;
    }

    let mut tags = post.tags;
    if let Some(label) = req.label {
        tags[index].label = label;
    }
    if let Some(link) = req.link {
        tags[index].link = link;
    }

    let tags = state
        .posts()
        .save_tags(&post_id, tags)
        .await
        .map_err(not_found_as_post)?;

    Ok(Json(TagsResponse {
        tags: convert::tags_to_views(tags),
    }))
}

/// DELETE /api/posts/:postId/tags/:tagId - 删除标签 (仅作者)
///
/// 按稳定 id 寻址：删除后旧 id 失效，再次删除报错而非静默。
pub async fn delete_tag(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((post_id, tag_id)): Path<(String, String)>,
) -> Result<Json<TagsResponse>, AppError> {
    let post_id = parse_record_id("post", &post_id)?;
    let post = fetch_post(&state, &post_id).await?;
    require_owner(&post, &user)?;

    let index = post
        .tag_index(&tag_id)
        .ok_or_else(|| AppError::new(ErrorCode::TagNotFound))?;

    let mut tags = post.tags;
    tags.remove(index);

    let tags = state
        .posts()
        .save_tags(&post_id, tags)
        .await
        .map_err(not_found_as_post)?;

    Ok(Json(TagsResponse {
        tags: convert::tags_to_views(tags),
    }))
}

/// DELETE /api/posts/:id - 删除帖子 (作者或管理员)
///
/// 同时服务 /api/admin/posts/:id：授权判断只有这一处。
pub async fn delete_post(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let post_id = parse_record_id("post", &id)?;
    let post = fetch_post(&state, &post_id).await?;

    if post.author.to_string() != user.id && !user.is_admin() {
        return Err(AppError::new(ErrorCode::NotOwner));
    }

    state.posts().delete(&post_id).await?;

    // Best-effort cleanup: the record is gone, a dangling file only costs disk
    if let Err(e) = state.asset_store.delete(&post.image_url).await {
        tracing::warn!(url = %post.image_url, error = %e, "Failed to delete post image");
    }

    tracing::info!(post_id = %post_id, actor = %user.id, "Post deleted");

    Ok(Json(ApiResponse::ok()))
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn fetch_post(state: &ServerState, id: &surrealdb::RecordId) -> Result<Post, AppError> {
    state
        .posts()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PostNotFound))
}

fn require_owner(post: &Post, user: &CurrentUser) -> Result<(), AppError> {
    if post.author.to_string() != user.id {
        return Err(AppError::new(ErrorCode::NotOwner));
    }
    Ok(())
}

/// Repository NotFound on a post id means the post vanished between
/// fetch and write - surface it with the domain code
fn not_found_as_post(err: crate::db::repository::RepoError) -> AppError {
    match err {
        crate::db::repository::RepoError::NotFound(_) => AppError::new(ErrorCode::PostNotFound),
        other => other.into(),
    }
}
