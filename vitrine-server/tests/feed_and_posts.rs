//! Content engine: feed pagination, likes, comments, deletion

mod common;

use axum::Json;
use axum::extract::{Path, Query, State};

use common::{as_admin, assert_code, create_post, register_user, test_state};
use shared::ErrorCode;
use shared::client::{CommentRequest, FeedParams};
use vitrine_server::api::posts::{add_comment, delete_post, feed, toggle_like};
use vitrine_server::api::users::search;
use vitrine_server::db::repository::parse_record_id;

fn page(n: u32) -> Query<FeedParams> {
    Query(FeedParams { page: Some(n) })
}

#[tokio::test]
async fn feed_is_newest_first_and_paginated() {
    let ctx = test_state().await;
    let author = register_user(&ctx.state, "author").await;

    for i in 0..12 {
        create_post(&ctx.state, &author, &format!("post {i}"), vec![]).await;
        // Distinct creation timestamps keep the ordering assertions exact
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let first = feed(State(ctx.state.clone()), page(1)).await.unwrap().0;
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].caption, "post 11");
    assert_eq!(first[9].caption, "post 2");
    // Author usernames are resolved into the feed
    assert_eq!(first[0].author.username, "author");

    let second = feed(State(ctx.state.clone()), page(2)).await.unwrap().0;
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].caption, "post 1");
    assert_eq!(second[1].caption, "post 0");

    let third = feed(State(ctx.state.clone()), page(3)).await.unwrap().0;
    assert!(third.is_empty());
}

#[tokio::test]
async fn like_toggle_flips_state_and_count() {
    let ctx = test_state().await;
    let author = register_user(&ctx.state, "author").await;
    let fan = register_user(&ctx.state, "fan").await;

    let post = create_post(&ctx.state, &author, "", vec![]).await;

    let liked = toggle_like(State(ctx.state.clone()), fan.clone(), Path(post.id.clone()))
        .await
        .unwrap()
        .0;
    assert!(liked.liked);
    assert_eq!(liked.likes_count, 1);

    // Second like from another user accumulates
    let also = toggle_like(
        State(ctx.state.clone()),
        author.clone(),
        Path(post.id.clone()),
    )
    .await
    .unwrap()
    .0;
    assert_eq!(also.likes_count, 2);

    // Unlike restores
    let unliked = toggle_like(State(ctx.state.clone()), fan.clone(), Path(post.id.clone()))
        .await
        .unwrap()
        .0;
    assert!(!unliked.liked);
    assert_eq!(unliked.likes_count, 1);

    let err = toggle_like(
        State(ctx.state.clone()),
        fan.clone(),
        Path("post:doesnotexist".to_string()),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::PostNotFound);
}

#[tokio::test]
async fn comments_append_in_order_and_empty_is_rejected() {
    let ctx = test_state().await;
    let author = register_user(&ctx.state, "author").await;
    let reader = register_user(&ctx.state, "reader").await;

    let post = create_post(&ctx.state, &author, "", vec![]).await;

    let err = add_comment(
        State(ctx.state.clone()),
        reader.clone(),
        Path(post.id.clone()),
        Json(CommentRequest {
            text: "   ".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::CommentEmpty);

    add_comment(
        State(ctx.state.clone()),
        reader.clone(),
        Path(post.id.clone()),
        Json(CommentRequest {
            text: "first!".to_string(),
        }),
    )
    .await
    .unwrap();

    let comments = add_comment(
        State(ctx.state.clone()),
        author.clone(),
        Path(post.id.clone()),
        Json(CommentRequest {
            text: "thanks".to_string(),
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "first!");
    assert_eq!(comments[0].author.username, "reader");
    assert_eq!(comments[1].text, "thanks");
    assert_eq!(comments[1].author.username, "author");
}

#[tokio::test]
async fn delete_post_enforces_owner_or_admin_and_cleans_asset() {
    let ctx = test_state().await;
    let author = register_user(&ctx.state, "author").await;
    let stranger = register_user(&ctx.state, "stranger").await;

    let post = create_post(&ctx.state, &author, "", vec![]).await;
    let image_path = ctx
        .tmp
        .path()
        .join("images")
        .join(post.image_url.rsplit('/').next().unwrap());
    assert!(image_path.exists());

    // Stranger cannot delete
    let err = delete_post(
        State(ctx.state.clone()),
        stranger.clone(),
        Path(post.id.clone()),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::NotOwner);

    // Owner deletes; the stored image goes with the record
    delete_post(
        State(ctx.state.clone()),
        author.clone(),
        Path(post.id.clone()),
    )
    .await
    .unwrap();

    let post_id = parse_record_id("post", &post.id).unwrap();
    assert!(
        ctx.state
            .posts()
            .find_by_id(&post_id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(!image_path.exists());

    // Deleting again: the post is gone
    let err = delete_post(
        State(ctx.state.clone()),
        author.clone(),
        Path(post.id.clone()),
    )
    .await
    .unwrap_err();
    assert_code(err, ErrorCode::PostNotFound);

    // Admin bypasses ownership through the same handler
    let second = create_post(&ctx.state, &author, "", vec![]).await;
    delete_post(
        State(ctx.state.clone()),
        as_admin(&stranger),
        Path(second.id.clone()),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn username_search_is_case_insensitive_and_capped() {
    let ctx = test_state().await;

    for i in 0..12 {
        register_user(&ctx.state, &format!("styler{i:02}")).await;
    }
    register_user(&ctx.state, "someoneelse").await;

    let results = search(State(ctx.state.clone()), Path("STYLER".to_string()))
        .await
        .unwrap()
        .0;
    assert_eq!(results.len(), 10);
    assert!(results.iter().all(|r| r.username.starts_with("styler")));

    // Substring match, identifier+username pairs only
    let results = search(State(ctx.state.clone()), Path("oneel".to_string()))
        .await
        .unwrap()
        .0;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].username, "someoneelse");
    assert!(!results[0].id.is_empty());
}
