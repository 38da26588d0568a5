//! Review and reaction service suite: uniqueness, the reaction state machine,
//! replies, statistics, listing, and batch deletes.

mod common;

use chrono::Utc;
use common::{seed_product, store, USER};
use vendora::domain::ReviewSort;
use vendora::error::AppError;
use vendora::service::reviews::{self, AddReplyInput, CreateReviewInput, ReplyInput, UpdateCommentsInput};
use vendora::store::{MemStore, Store};

fn review_input(product_id: &str, user_uuid: &str, comments: &str) -> CreateReviewInput {
    CreateReviewInput {
        product_id: product_id.to_string(),
        user_uuid: user_uuid.to_string(),
        comments: comments.to_string(),
        replies: vec![],
    }
}

async fn seeded() -> MemStore {
    let store = store().await;
    seed_product(&store, "PRD-P1", "p1", 100.0).await;
    store
}

async fn seed_review(store: &MemStore, user: &str) -> String {
    store.seed_user(user).await;
    reviews::create_review(store, review_input("PRD-P1", user, "really solid product overall"))
        .await
        .unwrap()
        .review_id
}

#[tokio::test]
async fn create_review_updates_the_product_count() {
    let store = seeded().await;
    let review = reviews::create_review(&store, review_input("PRD-P1", USER, "works as advertised"))
        .await
        .unwrap();
    assert!(review.review_id.starts_with("REV-"));
    assert_eq!(review.likes, 0);
    let product = store.product_by_id("PRD-P1").await.unwrap().unwrap();
    assert_eq!(product.review_count, 1);
}

#[tokio::test]
async fn one_review_per_user_per_product() {
    let store = seeded().await;
    seed_review(&store, USER).await;
    let err = reviews::create_review(&store, review_input("PRD-P1", USER, "trying to double-dip"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.count_reviews("PRD-P1").await.unwrap(), 1);
}

#[tokio::test]
async fn short_comments_and_missing_references_are_rejected() {
    let store = seeded().await;
    let short = reviews::create_review(&store, review_input("PRD-P1", USER, "too short"))
        .await
        .unwrap_err();
    assert!(matches!(short, AppError::Validation(_)));

    let no_product = reviews::create_review(&store, review_input("PRD-NOPE", USER, "where did it go?"))
        .await
        .unwrap_err();
    assert!(matches!(no_product, AppError::NotFound(_)));

    let no_user = reviews::create_review(
        &store,
        review_input("PRD-P1", "ghost-user", "i do not exist here"),
    )
    .await
    .unwrap_err();
    assert!(matches!(no_user, AppError::NotFound(_)));
}

#[tokio::test]
async fn creation_time_replies_must_carry_a_stamp() {
    let store = seeded().await;
    let mut input = review_input("PRD-P1", USER, "came with a question attached");
    input.replies = vec![ReplyInput {
        user_uuid: USER.to_string(),
        comment: "does it ship assembled?".to_string(),
        created_at: None,
    }];
    let err = reviews::create_review(&store, input).await.unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("created_at"), "got: {msg}"),
        other => panic!("expected validation error, got {other:?}"),
    }

    let stamp = Utc::now();
    let mut input = review_input("PRD-P1", USER, "came with a question attached");
    input.replies = vec![ReplyInput {
        user_uuid: USER.to_string(),
        comment: "does it ship assembled?".to_string(),
        created_at: Some(stamp),
    }];
    let review = reviews::create_review(&store, input).await.unwrap();
    assert_eq!(review.replies.len(), 1);
    assert_eq!(review.replies[0].created_at, stamp);
}

#[tokio::test]
async fn like_then_dislike_swaps_reactor_sets() {
    let store = seeded().await;
    let review_id = seed_review(&store, USER).await;

    let liked = reviews::like(&store, &review_id, USER).await.unwrap();
    assert_eq!(liked.likes, 1);
    assert_eq!(liked.liked_by, vec![USER.to_string()]);

    let disliked = reviews::dislike(&store, &review_id, USER).await.unwrap();
    assert_eq!(disliked.likes, 0);
    assert_eq!(disliked.dislikes, 1);
    assert!(disliked.liked_by.is_empty());
    assert_eq!(disliked.disliked_by, vec![USER.to_string()]);
}

#[tokio::test]
async fn repeat_reactions_conflict_and_empty_removal_is_invalid() {
    let store = seeded().await;
    let review_id = seed_review(&store, USER).await;

    reviews::like(&store, &review_id, USER).await.unwrap();
    let again = reviews::like(&store, &review_id, USER).await.unwrap_err();
    assert!(matches!(again, AppError::Conflict(_)));

    reviews::remove_reaction(&store, &review_id, USER).await.unwrap();
    let nothing = reviews::remove_reaction(&store, &review_id, USER)
        .await
        .unwrap_err();
    assert!(matches!(nothing, AppError::Validation(_)));
}

#[tokio::test]
async fn like_remove_dislike_ends_disliked() {
    let store = seeded().await;
    let review_id = seed_review(&store, USER).await;

    reviews::like(&store, &review_id, USER).await.unwrap();
    reviews::remove_reaction(&store, &review_id, USER).await.unwrap();
    let review = reviews::dislike(&store, &review_id, USER).await.unwrap();
    assert!(!review.liked_by.iter().any(|u| u == USER));
    assert!(review.disliked_by.iter().any(|u| u == USER));
    assert_eq!(review.likes as usize, review.liked_by.len());
    assert_eq!(review.dislikes as usize, review.disliked_by.len());
}

#[tokio::test]
async fn reactions_require_a_known_user_and_review() {
    let store = seeded().await;
    let review_id = seed_review(&store, USER).await;

    let no_review = reviews::like(&store, "REV-NOPE", USER).await.unwrap_err();
    assert!(matches!(no_review, AppError::NotFound(_)));
    let no_user = reviews::like(&store, &review_id, "ghost-user").await.unwrap_err();
    assert!(matches!(no_user, AppError::NotFound(_)));
}

#[tokio::test]
async fn replies_append_and_validate_length() {
    let store = seeded().await;
    let review_id = seed_review(&store, USER).await;

    let review = reviews::add_reply(
        &store,
        &review_id,
        AddReplyInput {
            user_uuid: USER.to_string(),
            comment: "thanks for sharing".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(review.replies.len(), 1);
    assert_eq!(review.replies[0].comment, "thanks for sharing");

    let short = reviews::add_reply(
        &store,
        &review_id,
        AddReplyInput {
            user_uuid: USER.to_string(),
            comment: "ok".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(short, AppError::Validation(_)));
}

#[tokio::test]
async fn update_comments_enforces_minimum_length() {
    let store = seeded().await;
    let review_id = seed_review(&store, USER).await;

    let updated = reviews::update_comments(
        &store,
        &review_id,
        UpdateCommentsInput {
            comments: "revised after more use".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.comments, "revised after more use");

    let err = reviews::update_comments(
        &store,
        &review_id,
        UpdateCommentsInput {
            comments: "meh".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn stats_aggregate_and_pick_the_first_top_review_on_ties() {
    let store = seeded().await;
    let first = seed_review(&store, "user-a").await;
    let second = seed_review(&store, "user-b").await;
    seed_review(&store, "user-c").await;

    for voter in ["v1", "v2"] {
        store.seed_user(voter).await;
        reviews::like(&store, &first, voter).await.unwrap();
    }
    store.seed_user("v3").await;
    reviews::like(&store, &second, "v3").await.unwrap();
    reviews::add_reply(
        &store,
        &second,
        AddReplyInput {
            user_uuid: USER.to_string(),
            comment: "agreed completely".to_string(),
        },
    )
    .await
    .unwrap();

    let stats = reviews::get_stats(&store, "PRD-P1").await.unwrap();
    assert_eq!(stats.total_reviews, 3);
    assert_eq!(stats.total_likes, 3);
    assert_eq!(stats.total_dislikes, 0);
    assert_eq!(stats.total_replies, 1);
    assert_eq!(stats.average_likes, 1.0);
    assert_eq!(stats.most_liked.unwrap().review_id, first);
}

#[tokio::test]
async fn stats_for_a_product_without_reviews_are_zeroed() {
    let store = seeded().await;
    let stats = reviews::get_stats(&store, "PRD-P1").await.unwrap();
    assert_eq!(stats.total_reviews, 0);
    assert!(stats.most_liked.is_none());

    let err = reviews::get_stats(&store, "PRD-NOPE").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn listing_sorts_by_likes_and_paginates_at_the_store() {
    let store = seeded().await;
    let first = seed_review(&store, "user-a").await;
    let second = seed_review(&store, "user-b").await;
    seed_review(&store, "user-c").await;

    for voter in ["v1", "v2"] {
        store.seed_user(voter).await;
        reviews::like(&store, &second, voter).await.unwrap();
    }
    store.seed_user("v3").await;
    reviews::like(&store, &first, "v3").await.unwrap();

    let page = reviews::list_by_product(&store, "PRD-P1", ReviewSort::Likes, None, Some(2))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.reviews.len(), 2);
    assert_eq!(page.reviews[0].review_id, second);
    assert_eq!(page.reviews[1].review_id, first);

    let rest = reviews::list_by_product(&store, "PRD-P1", ReviewSort::Likes, Some(2), Some(2))
        .await
        .unwrap();
    assert_eq!(rest.reviews.len(), 1);

    // The page size is capped, whatever the caller asks for.
    let capped = reviews::list_by_product(&store, "PRD-P1", ReviewSort::Newest, None, Some(500))
        .await
        .unwrap();
    assert_eq!(capped.limit, 50);
}

#[tokio::test]
async fn bulk_delete_names_missing_ids_and_deletes_nothing() {
    let store = seeded().await;
    let first = seed_review(&store, "user-a").await;

    let err = reviews::bulk_delete(&store, &[first.clone(), "REV-NOPE".to_string()])
        .await
        .unwrap_err();
    match err {
        AppError::NotFound(msg) => assert!(msg.contains("REV-NOPE")),
        other => panic!("expected not found, got {other:?}"),
    }
    assert_eq!(store.count_reviews("PRD-P1").await.unwrap(), 1);

    assert_eq!(reviews::bulk_delete(&store, &[first]).await.unwrap(), 1);
    let product = store.product_by_id("PRD-P1").await.unwrap().unwrap();
    assert_eq!(product.review_count, 0);
}

#[tokio::test]
async fn bulk_delete_validates_its_input_shape() {
    let store = seeded().await;
    assert!(matches!(
        reviews::bulk_delete(&store, &[]).await.unwrap_err(),
        AppError::Validation(_)
    ));
    assert!(matches!(
        reviews::bulk_delete(&store, &["  ".to_string()]).await.unwrap_err(),
        AppError::Validation(_)
    ));
}

#[tokio::test]
async fn delete_all_for_product_reports_the_count() {
    let store = seeded().await;
    seed_review(&store, "user-a").await;
    seed_review(&store, "user-b").await;

    assert_eq!(
        reviews::delete_all_for_product(&store, "PRD-P1").await.unwrap(),
        2
    );
    assert_eq!(
        reviews::delete_all_for_product(&store, "PRD-P1").await.unwrap(),
        0
    );
    let product = store.product_by_id("PRD-P1").await.unwrap().unwrap();
    assert_eq!(product.review_count, 0);
}
