//! Review and reaction service: one review per (product, user), mutually
//! exclusive like/dislike reactions, append-only replies, and aggregates.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::review::{compute_stats, ReactionError};
use crate::domain::{ProductReview, Reply, ReviewSort, ReviewStats};
use crate::error::{AppError, AppResult};
use crate::ids;
use crate::store::Store;

const MAX_PAGE_SIZE: i64 = 50;
const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewInput {
    pub product_id: String,
    pub user_uuid: String,
    #[validate(length(min = 10, message = "comments must be at least 10 characters"))]
    pub comments: String,
    #[serde(default)]
    pub replies: Vec<ReplyInput>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyInput {
    pub user_uuid: String,
    pub comment: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddReplyInput {
    pub user_uuid: String,
    #[validate(length(min = 5, message = "comment must be at least 5 characters"))]
    pub comment: String,
}

async fn require_user(store: &dyn Store, user_uuid: &str) -> AppResult<()> {
    if !store.user_exists(user_uuid).await? {
        return Err(AppError::not_found(format!("user {user_uuid} not found")));
    }
    Ok(())
}

async fn require_product(store: &dyn Store, product_id: &str) -> AppResult<()> {
    if store.product_by_id(product_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "product {product_id} not found"
        )));
    }
    Ok(())
}

async fn load_review(store: &dyn Store, review_id: &str) -> AppResult<ProductReview> {
    store
        .review_by_id(review_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("review {review_id} not found")))
}

/// Keeps the denormalized review count on the product in step. A product that
/// vanished concurrently is not an error here.
async fn refresh_review_count(store: &dyn Store, product_id: &str) -> AppResult<()> {
    if let Some(mut product) = store.product_by_id(product_id).await? {
        product.review_count = store.count_reviews(product_id).await? as i32;
        product.updated_at = Utc::now();
        store.save_product(&product).await?;
    }
    Ok(())
}

pub async fn create_review(
    store: &dyn Store,
    input: CreateReviewInput,
) -> AppResult<ProductReview> {
    input.validate()?;
    let mut replies = Vec::with_capacity(input.replies.len());
    for (idx, reply) in input.replies.into_iter().enumerate() {
        if reply.user_uuid.trim().is_empty() {
            return Err(AppError::validation(format!(
                "replies[{idx}].user_uuid must be a non-empty string"
            )));
        }
        if reply.comment.trim().is_empty() {
            return Err(AppError::validation(format!(
                "replies[{idx}].comment must be a non-empty string"
            )));
        }
        let created_at = reply.created_at.ok_or_else(|| {
            AppError::validation(format!("replies[{idx}].created_at is required"))
        })?;
        replies.push(Reply {
            user_uuid: reply.user_uuid,
            comment: reply.comment,
            created_at,
        });
    }

    require_product(store, &input.product_id).await?;
    require_user(store, &input.user_uuid).await?;
    // Advisory fast path; the (product_id, user_uuid) unique index is the
    // backstop under concurrent creates.
    if store
        .review_exists_for(&input.product_id, &input.user_uuid)
        .await?
    {
        return Err(AppError::conflict(
            "user has already reviewed this product",
        ));
    }

    let now = Utc::now();
    let review = ProductReview {
        review_id: ids::new_id("REV"),
        product_id: input.product_id,
        user_uuid: input.user_uuid,
        comments: input.comments,
        likes: 0,
        dislikes: 0,
        liked_by: vec![],
        disliked_by: vec![],
        replies,
        created_at: now,
        updated_at: now,
    };
    store
        .insert_review(&review)
        .await
        .map_err(|e| e.or_conflict("user has already reviewed this product"))?;
    refresh_review_count(store, &review.product_id).await?;
    tracing::info!(review_id = %review.review_id, product_id = %review.product_id, "review created");
    Ok(review)
}

pub async fn add_reply(
    store: &dyn Store,
    review_id: &str,
    input: AddReplyInput,
) -> AppResult<ProductReview> {
    input.validate()?;
    let mut review = load_review(store, review_id).await?;
    require_user(store, &input.user_uuid).await?;
    review.append_reply(&input.user_uuid, &input.comment);
    if store.save_review(&review).await? == 0 {
        return Err(AppError::not_found(format!("review {review_id} not found")));
    }
    Ok(review)
}

fn map_reaction_error(err: ReactionError) -> AppError {
    match err {
        ReactionError::AlreadyLiked => AppError::conflict("user has already liked this review"),
        ReactionError::AlreadyDisliked => {
            AppError::conflict("user has already disliked this review")
        }
        ReactionError::NoReaction => {
            AppError::validation("user has not liked or disliked this review")
        }
    }
}

async fn apply_reaction<F>(
    store: &dyn Store,
    review_id: &str,
    user_uuid: &str,
    transition: F,
) -> AppResult<ProductReview>
where
    F: FnOnce(&mut ProductReview) -> Result<(), ReactionError>,
{
    let mut review = load_review(store, review_id).await?;
    require_user(store, user_uuid).await?;
    transition(&mut review).map_err(map_reaction_error)?;
    if store.save_review(&review).await? == 0 {
        return Err(AppError::not_found(format!("review {review_id} not found")));
    }
    Ok(review)
}

pub async fn like(store: &dyn Store, review_id: &str, user_uuid: &str) -> AppResult<ProductReview> {
    apply_reaction(store, review_id, user_uuid, |r| r.like(user_uuid)).await
}

pub async fn dislike(
    store: &dyn Store,
    review_id: &str,
    user_uuid: &str,
) -> AppResult<ProductReview> {
    apply_reaction(store, review_id, user_uuid, |r| r.dislike(user_uuid)).await
}

pub async fn remove_reaction(
    store: &dyn Store,
    review_id: &str,
    user_uuid: &str,
) -> AppResult<ProductReview> {
    apply_reaction(store, review_id, user_uuid, |r| r.remove_reaction(user_uuid)).await
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentsInput {
    #[validate(length(min = 10, message = "comments must be at least 10 characters"))]
    pub comments: String,
}

pub async fn update_comments(
    store: &dyn Store,
    review_id: &str,
    input: UpdateCommentsInput,
) -> AppResult<ProductReview> {
    input.validate()?;
    let mut review = load_review(store, review_id).await?;
    review.comments = input.comments;
    review.updated_at = Utc::now();
    if store.save_review(&review).await? == 0 {
        return Err(AppError::not_found(format!("review {review_id} not found")));
    }
    Ok(review)
}

pub async fn get_stats(store: &dyn Store, product_id: &str) -> AppResult<ReviewStats> {
    require_product(store, product_id).await?;
    let reviews = store.all_reviews_for_product(product_id).await?;
    Ok(compute_stats(&reviews))
}

pub struct ReviewPage {
    pub reviews: Vec<ProductReview>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

/// Offset-based listing; the offset and limit are pushed down to storage,
/// never applied to an in-memory vector.
pub async fn list_by_product(
    store: &dyn Store,
    product_id: &str,
    sort: ReviewSort,
    page: Option<u32>,
    limit: Option<u32>,
) -> AppResult<ReviewPage> {
    require_product(store, product_id).await?;
    let page = page.unwrap_or(1).max(1);
    let limit = (limit.map(i64::from).unwrap_or(DEFAULT_PAGE_SIZE)).clamp(1, MAX_PAGE_SIZE);
    let offset = (page as i64 - 1) * limit;
    let reviews = store
        .reviews_by_product(product_id, sort, limit, offset)
        .await?;
    let total = store.count_reviews(product_id).await?;
    Ok(ReviewPage {
        reviews,
        page,
        limit: limit as u32,
        total,
    })
}

/// Verifies every id before deleting any; missing ids are named in the error
/// and nothing is removed.
pub async fn bulk_delete(store: &dyn Store, review_ids: &[String]) -> AppResult<u64> {
    if review_ids.is_empty() {
        return Err(AppError::validation("review_ids must be a non-empty array"));
    }
    if review_ids.iter().any(|id| id.trim().is_empty()) {
        return Err(AppError::validation(
            "review_ids must all be non-empty strings",
        ));
    }
    let missing = store.missing_reviews(review_ids).await?;
    if !missing.is_empty() {
        return Err(AppError::not_found(format!(
            "reviews not found: {}",
            missing.join(", ")
        )));
    }
    let mut product_ids: Vec<String> = Vec::new();
    for id in review_ids {
        if let Some(review) = store.review_by_id(id).await? {
            if !product_ids.contains(&review.product_id) {
                product_ids.push(review.product_id);
            }
        }
    }
    let deleted = store.delete_reviews(review_ids).await?;
    for product_id in &product_ids {
        refresh_review_count(store, product_id).await?;
    }
    tracing::info!(deleted, "reviews bulk-deleted");
    Ok(deleted)
}

pub async fn delete_review(store: &dyn Store, review_id: &str) -> AppResult<u64> {
    let review = load_review(store, review_id).await?;
    let deleted = store
        .delete_reviews(std::slice::from_ref(&review.review_id))
        .await?;
    if deleted == 0 {
        return Err(AppError::not_found(format!("review {review_id} not found")));
    }
    refresh_review_count(store, &review.product_id).await?;
    Ok(deleted)
}

/// Removes every review on the product and reports the count. Zero is a valid
/// outcome here; a product with no reviews is not an error.
pub async fn delete_all_for_product(store: &dyn Store, product_id: &str) -> AppResult<u64> {
    require_product(store, product_id).await?;
    let deleted = store.delete_reviews_for_product(product_id).await?;
    refresh_review_count(store, product_id).await?;
    tracing::info!(product_id, deleted, "reviews deleted for product");
    Ok(deleted)
}
