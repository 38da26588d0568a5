//! Combination ("bundle") service: named groupings of a parent product with
//! required child products and quantities.

use chrono::Utc;
use serde::Deserialize;

use crate::domain::{combination::validate_children, ChildProduct, ProductCombination};
use crate::error::{AppError, AppResult};
use crate::ids;
use crate::store::Store;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCombinationInput {
    pub parent_product_id: String,
    pub combination_name: String,
    pub description: Option<String>,
    pub child_products: Vec<ChildProduct>,
}

fn validate_input(input: &CreateCombinationInput) -> AppResult<()> {
    if input.parent_product_id.trim().is_empty() {
        return Err(AppError::validation("parent_product_id is required"));
    }
    if input.combination_name.trim().is_empty() {
        return Err(AppError::validation("combination_name is required"));
    }
    validate_children(&input.child_products)
}

/// Batch existence check; the error names every missing id at once.
async fn require_products(store: &dyn Store, ids: &[String], role: &str) -> AppResult<()> {
    let missing = store.missing_products(ids).await?;
    if !missing.is_empty() {
        return Err(AppError::not_found(format!(
            "{role} products not found: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

fn distinct(ids: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn build(input: CreateCombinationInput) -> ProductCombination {
    let now = Utc::now();
    ProductCombination {
        combination_id: ids::new_id("CMB"),
        parent_product_id: input.parent_product_id,
        combination_name: input.combination_name.trim().to_string(),
        description: input.description,
        child_products: input.child_products,
        created_at: now,
        updated_at: now,
    }
}

pub async fn create(
    store: &dyn Store,
    input: CreateCombinationInput,
) -> AppResult<ProductCombination> {
    validate_input(&input)?;
    require_products(store, &[input.parent_product_id.clone()], "parent").await?;
    let children = distinct(input.child_products.iter().map(|c| c.product_id.clone()));
    require_products(store, &children, "child").await?;
    let combination = build(input);
    store
        .insert_combinations(std::slice::from_ref(&combination))
        .await
        .map_err(|e| e.or_conflict("combination id already in use"))?;
    tracing::info!(combination_id = %combination.combination_id, "combination created");
    Ok(combination)
}

/// Validates every entry and resolves every referenced product before writing
/// anything; the batch goes in atomically or not at all.
pub async fn bulk_create(
    store: &dyn Store,
    inputs: Vec<CreateCombinationInput>,
) -> AppResult<Vec<ProductCombination>> {
    if inputs.is_empty() {
        return Err(AppError::validation(
            "combinations must be a non-empty array",
        ));
    }
    for input in &inputs {
        validate_input(input)?;
    }
    let parents = distinct(inputs.iter().map(|i| i.parent_product_id.clone()));
    require_products(store, &parents, "parent").await?;
    let children = distinct(
        inputs
            .iter()
            .flat_map(|i| i.child_products.iter().map(|c| c.product_id.clone())),
    );
    require_products(store, &children, "child").await?;

    let combinations: Vec<ProductCombination> = inputs.into_iter().map(build).collect();
    store
        .insert_combinations(&combinations)
        .await
        .map_err(|e| e.or_conflict("combination id already in use"))?;
    tracing::info!(count = combinations.len(), "combinations bulk-created");
    Ok(combinations)
}

pub async fn get_by_id(store: &dyn Store, combination_id: &str) -> AppResult<ProductCombination> {
    store
        .combination_by_id(combination_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("combination {combination_id} not found")))
}

pub async fn list_by_parent(
    store: &dyn Store,
    parent_product_id: &str,
) -> AppResult<Vec<ProductCombination>> {
    store.combinations_by_parent(parent_product_id).await
}

/// Every bundle whose child list references the product. A full scan of the
/// combinations table; fine at catalog scale.
pub async fn list_containing(
    store: &dyn Store,
    product_id: &str,
) -> AppResult<Vec<ProductCombination>> {
    store.combinations_containing(product_id).await
}

#[derive(Debug, Default, Deserialize)]
pub struct CombinationPatch {
    pub combination_name: Option<String>,
    pub description: Option<String>,
    pub child_products: Option<Vec<ChildProduct>>,
}

pub async fn update(
    store: &dyn Store,
    combination_id: &str,
    patch: CombinationPatch,
) -> AppResult<ProductCombination> {
    let mut combination = get_by_id(store, combination_id).await?;
    if patch.combination_name.is_none()
        && patch.description.is_none()
        && patch.child_products.is_none()
    {
        return Err(AppError::validation("no fields to update"));
    }
    if let Some(name) = patch.combination_name {
        if name.trim().is_empty() {
            return Err(AppError::validation("combination_name cannot be empty"));
        }
        combination.combination_name = name.trim().to_string();
    }
    if let Some(description) = patch.description {
        combination.description = Some(description);
    }
    if let Some(children) = patch.child_products {
        validate_children(&children)?;
        let ids = distinct(children.iter().map(|c| c.product_id.clone()));
        require_products(store, &ids, "child").await?;
        combination.child_products = children;
    }
    combination.updated_at = Utc::now();
    if store.save_combination(&combination).await? == 0 {
        return Err(AppError::not_found(format!(
            "combination {combination_id} not found"
        )));
    }
    Ok(combination)
}

pub async fn delete(store: &dyn Store, combination_id: &str) -> AppResult<u64> {
    let affected = store.delete_combination(combination_id).await?;
    if affected == 0 {
        return Err(AppError::not_found(format!(
            "combination {combination_id} not found"
        )));
    }
    Ok(affected)
}

/// Removes every bundle parented by the product and reports how many went.
/// Not transactionally safe against concurrent writers; the deployment model
/// assumes a single writer per parent.
pub async fn delete_all_for_parent(store: &dyn Store, parent_product_id: &str) -> AppResult<u64> {
    let deleted = store
        .delete_combinations_for_parent(parent_product_id)
        .await?;
    tracing::info!(parent_product_id, deleted, "combinations deleted for parent");
    Ok(deleted)
}
