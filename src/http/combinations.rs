//! Bundle (product combination) handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::domain::ProductCombination;
use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::service::bundles::{self, CombinationPatch, CreateCombinationInput};

use super::AppState;

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCombinationInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductCombination>>)> {
    let combination = bundles::create(state.store.as_ref(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("combination created", combination)),
    ))
}

pub async fn bulk_create(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<CreateCombinationInput>>,
) -> AppResult<(StatusCode, Json<ApiResponse<Vec<ProductCombination>>>)> {
    let combinations = bundles::bulk_create(state.store.as_ref(), inputs).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("combinations created", combinations)),
    ))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductCombination>>> {
    let combination = bundles::get_by_id(state.store.as_ref(), &id).await?;
    Ok(Json(ApiResponse::success("combination fetched", combination)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CombinationPatch>,
) -> AppResult<Json<ApiResponse<ProductCombination>>> {
    let combination = bundles::update(state.store.as_ref(), &id, patch).await?;
    Ok(Json(ApiResponse::success("combination updated", combination)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let affected = bundles::delete(state.store.as_ref(), &id).await?;
    Ok(Json(ApiResponse::success("combination deleted", affected)))
}

pub async fn list_by_parent(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<ProductCombination>>>> {
    let combinations = bundles::list_by_parent(state.store.as_ref(), &product_id).await?;
    Ok(Json(ApiResponse::success("combinations fetched", combinations)))
}

pub async fn list_containing(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<ProductCombination>>>> {
    let combinations = bundles::list_containing(state.store.as_ref(), &product_id).await?;
    Ok(Json(ApiResponse::success("combinations fetched", combinations)))
}

pub async fn remove_all_for_parent(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<u64>>> {
    let deleted = bundles::delete_all_for_parent(state.store.as_ref(), &product_id).await?;
    Ok(Json(ApiResponse::success("combinations deleted", deleted)))
}
