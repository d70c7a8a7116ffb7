//! Tag engine: click analytics, ownership-checked edits and deletes,
//! stable-id addressing

mod common;

use axum::Json;
use axum::extract::{Path, State};

use common::{assert_code, create_post, register_user, tag_draft, test_state};
use shared::ErrorCode;
use shared::client::TagEditRequest;
use vitrine_server::api::posts::{click_tag, create_post_inner, delete_tag, edit_tag};
use vitrine_server::api::users::profile;
use vitrine_server::api::posts::ImagePart;

fn edit(label: Option<&str>, link: Option<&str>) -> TagEditRequest {
    TagEditRequest {
        label: label.map(str::to_string),
        link: link.map(str::to_string),
    }
}

#[tokio::test]
async fn clicks_are_monotonic_under_sequential_increments() {
    let ctx = test_state().await;
    let owner = register_user(&ctx.state, "owner").await;
    let visitor = register_user(&ctx.state, "visitor").await;

    let post = create_post(
        &ctx.state,
        &owner,
        "fit check",
        vec![tag_draft("Shirt", "https://shop.example/shirt")],
    )
    .await;
    let tag_id = post.tags[0].id.clone();
    assert_eq!(post.tags[0].clicks, 0);

    // Clicks come from any authenticated user, no ownership involved;
    // `visitor` is registered above to mirror that
    let _ = visitor;
    for expected in 1..=5u32 {
        let response = click_tag(
            State(ctx.state.clone()),
            Path((post.id.clone(), tag_id.clone())),
        )
        .await
        .unwrap()
        .0;
        assert_eq!(response.clicks, expected);
    }
}

#[tokio::test]
async fn edit_rejects_short_label_and_bad_link() {
    let ctx = test_state().await;
    let owner = register_user(&ctx.state, "owner").await;

    let post = create_post(
        &ctx.state,
        &owner,
        "",
        vec![tag_draft("Jeans", "https://shop.example/jeans")],
    )
    .await;
    let tag_id = post.tags[0].id.clone();

    let err = edit_tag(
        State(ctx.state.clone()),
        owner.clone(),
        Path((post.id.clone(), tag_id.clone())),
        Json(edit(Some("j"), None)),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::InvalidTagLabel);

    let err = edit_tag(
        State(ctx.state.clone()),
        owner.clone(),
        Path((post.id.clone(), tag_id.clone())),
        Json(edit(None, Some("ftp://shop.example"))),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::InvalidTagLink);

    // Nothing was applied
    let post_id = vitrine_server::db::repository::parse_record_id("post", &post.id).unwrap();
    let stored = ctx
        .state
        .posts()
        .find_by_id(&post_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.tags[0].label, "Jeans");
    assert_eq!(stored.tags[0].link, "https://shop.example/jeans");
}

#[tokio::test]
async fn edit_applies_only_provided_fields() {
    let ctx = test_state().await;
    let owner = register_user(&ctx.state, "owner").await;

    let post = create_post(
        &ctx.state,
        &owner,
        "",
        vec![tag_draft("Jeans", "https://shop.example/jeans")],
    )
    .await;
    let tag_id = post.tags[0].id.clone();

    let response = edit_tag(
        State(ctx.state.clone()),
        owner.clone(),
        Path((post.id.clone(), tag_id.clone())),
        Json(edit(Some("Denim"), None)),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(response.tags[0].label, "Denim");
    // Link untouched
    assert_eq!(response.tags[0].link, "https://shop.example/jeans");
    assert_eq!(response.tags[0].id, tag_id);
}

#[tokio::test]
async fn tag_mutations_require_ownership_but_clicks_do_not() {
    let ctx = test_state().await;
    let owner = register_user(&ctx.state, "owner").await;
    let intruder = register_user(&ctx.state, "intruder").await;

    let post = create_post(
        &ctx.state,
        &owner,
        "",
        vec![tag_draft("Shoes", "https://shop.example/shoes")],
    )
    .await;
    let tag_id = post.tags[0].id.clone();

    let err = edit_tag(
        State(ctx.state.clone()),
        intruder.clone(),
        Path((post.id.clone(), tag_id.clone())),
        Json(edit(Some("Sneakers"), None)),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::NotOwner);

    let err = delete_tag(
        State(ctx.state.clone()),
        intruder.clone(),
        Path((post.id.clone(), tag_id.clone())),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::NotOwner);

    // A non-owner click is fine - it represents a feed visitor
    let response = click_tag(
        State(ctx.state.clone()),
        Path((post.id.clone(), tag_id.clone())),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(response.clicks, 1);
}

#[tokio::test]
async fn delete_removes_exactly_one_and_stale_ids_error() {
    let ctx = test_state().await;
    let owner = register_user(&ctx.state, "owner").await;

    let post = create_post(
        &ctx.state,
        &owner,
        "",
        vec![
            tag_draft("Hat", "https://shop.example/hat"),
            tag_draft("Coat", "https://shop.example/coat"),
            tag_draft("Boots", "https://shop.example/boots"),
        ],
    )
    .await;
    let first_id = post.tags[0].id.clone();

    let response = delete_tag(
        State(ctx.state.clone()),
        owner.clone(),
        Path((post.id.clone(), first_id.clone())),
    )
    .await
    .unwrap()
    .0;

    // Exactly one element gone, order of the rest preserved
    assert_eq!(response.tags.len(), 2);
    assert_eq!(response.tags[0].label, "Coat");
    assert_eq!(response.tags[1].label, "Boots");

    // The stale id no longer resolves - never a silent no-op
    let err = delete_tag(
        State(ctx.state.clone()),
        owner.clone(),
        Path((post.id.clone(), first_id)),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::TagNotFound);

    let err = click_tag(
        State(ctx.state.clone()),
        Path((post.id.clone(), "nosuchtag".to_string())),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::TagNotFound);
}

#[tokio::test]
async fn creation_validates_tags_like_edit_does() {
    let ctx = test_state().await;
    let owner = register_user(&ctx.state, "owner").await;

    // Label under 2 chars is rejected at creation, not stored as-is
    let err = create_post_inner(
        ctx.state.clone(),
        owner.clone(),
        common::image_part(1),
        String::new(),
        vec![tag_draft("x", "https://shop.example")],
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::InvalidTagLabel);

    let err = create_post_inner(
        ctx.state.clone(),
        owner.clone(),
        common::image_part(2),
        String::new(),
        vec![tag_draft("Scarf", "javascript:alert(1)")],
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::InvalidTagLink);
}

#[tokio::test]
async fn missing_image_is_rejected() {
    let ctx = test_state().await;
    let owner = register_user(&ctx.state, "owner").await;

    let none: Option<ImagePart> = None;
    let err = create_post_inner(ctx.state.clone(), owner.clone(), none, String::new(), vec![])
        .await
        .unwrap_err();
    assert_code(err, ErrorCode::ImageMissing);
}

#[tokio::test]
async fn edit_then_profile_end_to_end() {
    let ctx = test_state().await;
    let owner = register_user(&ctx.state, "owner").await;

    let post = create_post(
        &ctx.state,
        &owner,
        "two tags",
        vec![
            tag_draft("Shirt", "https://shop.example/shirt"),
            tag_draft("Jeans", "https://shop.example/jeans"),
        ],
    )
    .await;

    edit_tag(
        State(ctx.state.clone()),
        owner.clone(),
        Path((post.id.clone(), post.tags[0].id.clone())),
        Json(edit(Some("Linen Shirt"), None)),
    )
    .await
    .unwrap();

    let profile_view = profile(State(ctx.state.clone()), Path(owner.id.clone()))
        .await
        .unwrap()
        .0;

    assert_eq!(profile_view.posts.len(), 1);
    let tags = &profile_view.posts[0].tags;
    assert_eq!(tags[0].label, "Linen Shirt");
    assert_eq!(tags[1].label, "Jeans");
    assert_eq!(tags[0].clicks, 0);
    assert_eq!(tags[1].clicks, 0);
}
