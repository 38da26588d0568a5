//! Review and reaction handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::{ProductReview, ReviewSort, ReviewStats};
use crate::error::AppResult;
use crate::response::{ApiResponse, Pagination};
use crate::service::reviews::{self, AddReplyInput, CreateReviewInput, UpdateCommentsInput};

use super::AppState;

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateReviewInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductReview>>)> {
    let review = reviews::create_review(state.store.as_ref(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("review created", review)),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ReactionBody {
    pub user_uuid: String,
}

pub async fn like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReactionBody>,
) -> AppResult<Json<ApiResponse<ProductReview>>> {
    let review = reviews::like(state.store.as_ref(), &id, &body.user_uuid).await?;
    Ok(Json(ApiResponse::success("review liked", review)))
}

pub async fn dislike(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReactionBody>,
) -> AppResult<Json<ApiResponse<ProductReview>>> {
    let review = reviews::dislike(state.store.as_ref(), &id, &body.user_uuid).await?;
    Ok(Json(ApiResponse::success("review disliked", review)))
}

pub async fn remove_reaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReactionBody>,
) -> AppResult<Json<ApiResponse<ProductReview>>> {
    let review = reviews::remove_reaction(state.store.as_ref(), &id, &body.user_uuid).await?;
    Ok(Json(ApiResponse::success("reaction removed", review)))
}

pub async fn add_reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AddReplyInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductReview>>)> {
    let review = reviews::add_reply(state.store.as_ref(), &id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("reply added", review)),
    ))
}

pub async fn update_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCommentsInput>,
) -> AppResult<Json<ApiResponse<ProductReview>>> {
    let review = reviews::update_comments(state.store.as_ref(), &id, input).await?;
    Ok(Json(ApiResponse::success("review updated", review)))
}

pub async fn stats(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<ReviewStats>>> {
    let stats = reviews::get_stats(state.store.as_ref(), &product_id).await?;
    Ok(Json(ApiResponse::success("review stats fetched", stats)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub sort_by: ReviewSort,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

pub async fn list_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Vec<ProductReview>>>> {
    let page = reviews::list_by_product(
        state.store.as_ref(),
        &product_id,
        params.sort_by,
        params.page,
        params.limit,
    )
    .await?;
    Ok(Json(ApiResponse::paginated(
        "reviews fetched",
        page.reviews,
        Pagination {
            page: page.page,
            limit: page.limit,
            total: page.total,
        },
    )))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteBody {
    pub review_ids: Vec<String>,
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Json(body): Json<BulkDeleteBody>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let deleted = reviews::bulk_delete(state.store.as_ref(), &body.review_ids).await?;
    Ok(Json(ApiResponse::success("reviews deleted", deleted)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let deleted = reviews::delete_review(state.store.as_ref(), &id).await?;
    Ok(Json(ApiResponse::success("review deleted", deleted)))
}

pub async fn remove_all_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let deleted = reviews::delete_all_for_product(state.store.as_ref(), &product_id).await?;
    Ok(Json(ApiResponse::success("reviews deleted", deleted)))
}
