//! Combination service suite: validation, batch existence checks, atomic
//! bulk creation, and parent-scoped deletes.

mod common;

use common::{seed_product, store};
use vendora::domain::ChildProduct;
use vendora::error::AppError;
use vendora::service::bundles::{self, CombinationPatch, CreateCombinationInput};

fn child(product_id: &str, quantity: i64) -> ChildProduct {
    ChildProduct {
        product_id: product_id.to_string(),
        quantity,
    }
}

fn combo(parent: &str, name: &str, children: Vec<ChildProduct>) -> CreateCombinationInput {
    CreateCombinationInput {
        parent_product_id: parent.to_string(),
        combination_name: name.to_string(),
        description: None,
        child_products: children,
    }
}

async fn seeded() -> vendora::store::MemStore {
    let store = store().await;
    for (id, slug) in [("PRD-A", "alpha"), ("PRD-B", "beta"), ("PRD-C", "gamma")] {
        seed_product(&store, id, slug, 10.0).await;
    }
    store
}

#[tokio::test]
async fn create_persists_an_ordered_child_list() {
    let store = seeded().await;
    let combination = bundles::create(
        &store,
        combo("PRD-A", "Starter Kit", vec![child("PRD-B", 2), child("PRD-C", 1)]),
    )
    .await
    .unwrap();
    assert!(combination.combination_id.starts_with("CMB-"));
    assert_eq!(combination.child_products[0], child("PRD-B", 2));
    assert_eq!(combination.child_products[1], child("PRD-C", 1));
}

#[tokio::test]
async fn missing_child_fails_and_persists_nothing() {
    let store = seeded().await;
    let err = bundles::create(
        &store,
        combo("PRD-A", "Broken", vec![child("PRD-B", 1), child("PRD-NOPE", 1)]),
    )
    .await
    .unwrap_err();
    match err {
        AppError::NotFound(msg) => assert!(msg.contains("PRD-NOPE")),
        other => panic!("expected not found, got {other:?}"),
    }
    assert!(bundles::list_by_parent(&store, "PRD-A").await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_children_are_rejected() {
    let store = seeded().await;
    let empty = bundles::create(&store, combo("PRD-A", "Empty", vec![]))
        .await
        .unwrap_err();
    assert!(matches!(empty, AppError::Validation(_)));

    let zero_qty = bundles::create(&store, combo("PRD-A", "Zero", vec![child("PRD-B", 0)]))
        .await
        .unwrap_err();
    assert!(matches!(zero_qty, AppError::Validation(_)));
}

#[tokio::test]
async fn bulk_create_yields_exactly_n_rows_with_distinct_ids() {
    let store = seeded().await;
    let combinations = bundles::bulk_create(
        &store,
        vec![
            combo("PRD-A", "Kit 1", vec![child("PRD-B", 1)]),
            combo("PRD-A", "Kit 2", vec![child("PRD-C", 2)]),
            combo("PRD-B", "Kit 3", vec![child("PRD-A", 1), child("PRD-C", 3)]),
        ],
    )
    .await
    .unwrap();
    assert_eq!(combinations.len(), 3);
    let mut ids: Vec<&str> = combinations
        .iter()
        .map(|c| c.combination_id.as_str())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert_eq!(bundles::list_by_parent(&store, "PRD-A").await.unwrap().len(), 2);
}

#[tokio::test]
async fn bulk_create_rejects_the_whole_batch_on_one_bad_entry() {
    let store = seeded().await;
    let err = bundles::bulk_create(
        &store,
        vec![
            combo("PRD-A", "Good", vec![child("PRD-B", 1)]),
            combo("PRD-A", "Bad", vec![child("PRD-MISSING", 1)]),
        ],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(bundles::list_by_parent(&store, "PRD-A").await.unwrap().is_empty());
}

#[tokio::test]
async fn list_containing_filters_on_child_membership() {
    let store = seeded().await;
    bundles::create(&store, combo("PRD-A", "Kit 1", vec![child("PRD-B", 1)]))
        .await
        .unwrap();
    bundles::create(&store, combo("PRD-C", "Kit 2", vec![child("PRD-B", 2)]))
        .await
        .unwrap();
    bundles::create(&store, combo("PRD-A", "Kit 3", vec![child("PRD-C", 1)]))
        .await
        .unwrap();

    let containing_b = bundles::list_containing(&store, "PRD-B").await.unwrap();
    assert_eq!(containing_b.len(), 2);
    // Parent membership does not count as containment.
    let containing_a = bundles::list_containing(&store, "PRD-A").await.unwrap();
    assert!(containing_a.is_empty());
}

#[tokio::test]
async fn update_revalidates_children() {
    let store = seeded().await;
    let combination = bundles::create(&store, combo("PRD-A", "Kit", vec![child("PRD-B", 1)]))
        .await
        .unwrap();

    let err = bundles::update(
        &store,
        &combination.combination_id,
        CombinationPatch {
            child_products: Some(vec![child("PRD-NOPE", 1)]),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let updated = bundles::update(
        &store,
        &combination.combination_id,
        CombinationPatch {
            combination_name: Some("Kit v2".into()),
            child_products: Some(vec![child("PRD-C", 4)]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.combination_name, "Kit v2");
    assert_eq!(updated.child_products, vec![child("PRD-C", 4)]);
}

#[tokio::test]
async fn delete_all_for_parent_reports_a_count() {
    let store = seeded().await;
    bundles::create(&store, combo("PRD-A", "Kit 1", vec![child("PRD-B", 1)]))
        .await
        .unwrap();
    bundles::create(&store, combo("PRD-A", "Kit 2", vec![child("PRD-C", 1)]))
        .await
        .unwrap();

    assert_eq!(bundles::delete_all_for_parent(&store, "PRD-A").await.unwrap(), 2);
    // A parent with nothing left reports zero rather than erroring.
    assert_eq!(bundles::delete_all_for_parent(&store, "PRD-A").await.unwrap(), 0);
}

#[tokio::test]
async fn delete_of_unknown_combination_is_not_found() {
    let store = seeded().await;
    let err = bundles::delete(&store, "CMB-NOPE").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
