//! Entity-manager pipeline tests against the in-memory store.

use menu_catalog::model::{Filter, Page};
use menu_catalog::store::traits::{CategoryStore, ItemStore};
use menu_catalog::{CategoryManager, ItemManager, MemoryStore, PipelineError, SubcategoryManager};
use rust_decimal::Decimal;
use serde_json::json;

fn category_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "image": "http://img/category.png",
        "description": "a category",
    })
}

fn item_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "image": "http://img/item.png",
        "description": "an item",
        "taxable": true,
        "tax": 2.5,
        "base_amount": 100.0,
        "discount": 10.0,
    })
}

#[tokio::test]
async fn create_category_assigns_id_and_defaults() {
    let store = MemoryStore::new();
    let category = CategoryManager::new(&store)
        .create(&category_body("Starters"))
        .await
        .unwrap();

    assert_eq!(category.id, 1);
    assert_eq!(category.name, "Starters");
    assert!(category.taxable);
    assert_eq!(category.tax, Decimal::ZERO);
}

#[tokio::test]
async fn duplicate_category_name_is_rejected_without_insert() {
    let store = MemoryStore::new();
    let manager = CategoryManager::new(&store);
    manager.create(&category_body("Starters")).await.unwrap();

    let err = manager.create(&category_body("Starters")).await.unwrap_err();
    assert!(matches!(err, PipelineError::AlreadyExists { .. }));

    let rows = store
        .list_categories(&Filter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn validation_failure_short_circuits_with_violations() {
    let store = MemoryStore::new();
    let err = CategoryManager::new(&store)
        .create(&json!({"name": "No image"}))
        .await
        .unwrap_err();

    match err {
        PipelineError::Validation { violations, .. } => {
            let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
            assert!(fields.contains(&"image"));
            assert!(fields.contains(&"description"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let rows = store
        .list_categories(&Filter::default(), Page::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn subcategory_creation_injects_category_id_from_route() {
    let store = MemoryStore::new();
    let category = CategoryManager::new(&store)
        .create(&category_body("Mains"))
        .await
        .unwrap();

    // A body-supplied category_id must lose against the path-derived one.
    let body = json!({
        "name": "Grills",
        "image": "http://img/grills.png",
        "description": "grilled things",
        "category_id": 999,
    });
    let subcategory = SubcategoryManager::new(&store)
        .create(&body, category.id)
        .await
        .unwrap();

    assert_eq!(subcategory.category_id, Some(category.id));
}

#[tokio::test]
async fn item_creation_derives_total_amount() {
    let store = MemoryStore::new();
    let item = ItemManager::new(&store)
        .create_under_category(&item_body("Pasta"), 1)
        .await
        .unwrap();

    assert_eq!(item.category_id, Some(1));
    assert_eq!(item.subcategory_id, None);
    assert_eq!(item.total_amount, Some(Decimal::new(9000, 2)));
}

#[tokio::test]
async fn explicit_total_amount_is_never_overwritten() {
    let store = MemoryStore::new();
    let mut body = item_body("Pizza");
    body["total_amount"] = json!(50.0);

    let item = ItemManager::new(&store)
        .create_under_subcategory(&body, 3)
        .await
        .unwrap();

    assert_eq!(item.subcategory_id, Some(3));
    assert_eq!(item.category_id, None);
    assert_eq!(item.total_amount, Some(Decimal::new(5000, 2)));
}

#[tokio::test]
async fn item_creation_populates_exactly_one_foreign_key() {
    let store = MemoryStore::new();
    let mut body = item_body("Salad");
    // A body-supplied opposite foreign key is dropped on the category route.
    body["subcategory_id"] = json!(7);

    let item = ItemManager::new(&store)
        .create_under_category(&body, 4)
        .await
        .unwrap();

    assert_eq!(item.category_id, Some(4));
    assert_eq!(item.subcategory_id, None);
}

#[tokio::test]
async fn get_by_id_round_trips_the_persisted_row() {
    let store = MemoryStore::new();
    let manager = ItemManager::new(&store);
    let created = manager
        .create_under_category(&item_body("Soup"), 2)
        .await
        .unwrap();

    let fetched = manager
        .get_by(&Filter::by_id(created.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn listing_respects_limit_and_offset() {
    let store = MemoryStore::new();
    let manager = CategoryManager::new(&store);
    for n in 0..15 {
        manager
            .create(&category_body(&format!("Category {n}")))
            .await
            .unwrap();
    }

    let first_page = manager
        .list(&Filter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(first_page.len(), 10);

    let window = manager
        .list(&Filter::default(), Page::new(Some(5), Some(10)))
        .await
        .unwrap();
    assert_eq!(window.len(), 5);
    assert_eq!(window[0].name, "Category 10");
}

#[tokio::test]
async fn item_search_matches_substring_and_empty_q_lists_all() {
    let store = MemoryStore::new();
    let manager = ItemManager::new(&store);
    for name in ["Margherita", "Marinara", "Calzone"] {
        manager
            .create_under_category(&item_body(name), 1)
            .await
            .unwrap();
    }

    let hits = manager
        .list(&Filter::default(), Page::default(), Some("Mar"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|item| item.name.contains("Mar")));

    let all = manager
        .list(&Filter::default(), Page::default(), Some(""))
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn item_search_treats_wildcard_characters_literally() {
    let store = MemoryStore::new();
    let manager = ItemManager::new(&store);
    for name in ["100% Rye", "100 Club", "Under_score"] {
        manager
            .create_under_category(&item_body(name), 1)
            .await
            .unwrap();
    }

    let hits = manager
        .list(&Filter::default(), Page::default(), Some("100%"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "100% Rye");

    let underscore = manager
        .list(&Filter::default(), Page::default(), Some("r_s"))
        .await
        .unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].name, "Under_score");
}

#[tokio::test]
async fn updating_missing_item_fails_with_not_found() {
    let store = MemoryStore::new();
    let err = ItemManager::new(&store)
        .update(42, &json!({"base_amount": 10.0, "discount": 1.0}))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { id: 42, .. }));

    let rows = store
        .list_items(&Filter::default(), Page::default(), None)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn item_update_requires_pricing_fields() {
    let store = MemoryStore::new();
    let manager = ItemManager::new(&store);
    let created = manager
        .create_under_category(&item_body("Burger"), 1)
        .await
        .unwrap();

    let err = manager
        .update(created.id, &json!({"name": "Cheeseburger"}))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation { .. }));
}

#[tokio::test]
async fn item_update_rederives_total_from_new_pricing() {
    let store = MemoryStore::new();
    let manager = ItemManager::new(&store);
    let created = manager
        .create_under_category(&item_body("Wrap"), 1)
        .await
        .unwrap();

    let updated = manager
        .update(created.id, &json!({"base_amount": 80.0, "discount": 5.0}))
        .await
        .unwrap();
    assert_eq!(updated.total_amount, Some(Decimal::new(7500, 2)));
    // Untouched fields survive the patch.
    assert_eq!(updated.name, "Wrap");
}

#[tokio::test]
async fn partial_category_patch_touches_only_supplied_fields() {
    let store = MemoryStore::new();
    let manager = CategoryManager::new(&store);
    let created = manager.create(&category_body("Desserts")).await.unwrap();

    let updated = manager
        .update(created.id, &json!({"description": "sweet things"}))
        .await
        .unwrap();

    assert_eq!(updated.description, "sweet things");
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.image, created.image);
    assert_eq!(updated.tax, created.tax);
}

#[tokio::test]
async fn updating_missing_category_surfaces_not_found() {
    let store = MemoryStore::new();
    let err = CategoryManager::new(&store)
        .update(9, &json!({"name": "Ghost"}))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { id: 9, .. }));
}

#[tokio::test]
async fn subcategory_patch_bumps_updated_at() {
    let store = MemoryStore::new();
    let manager = SubcategoryManager::new(&store);
    let created = manager
        .create(&category_body("Sides"), 1)
        .await
        .unwrap();

    let updated = manager.update(created.id, &json!({})).await.unwrap();
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.name, created.name);
}

#[tokio::test]
async fn unknown_filter_columns_are_a_validation_error() {
    let store = MemoryStore::new();
    let filter = Filter::new().with("tax", json!(1.0));
    let err = CategoryManager::new(&store)
        .get_by(&filter)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation { .. }));
}

#[tokio::test]
async fn store_level_inserts_do_not_enforce_name_uniqueness() {
    // The duplicate-name rule is a pre-insert check with no store constraint;
    // two racing creates can both pass it and both insert.
    use menu_catalog::model::CategoryDraft;

    let store = MemoryStore::new();
    let draft = CategoryDraft {
        name: "Racy".into(),
        image: "http://img/racy.png".into(),
        description: "raced".into(),
        taxable: None,
        tax: None,
    };
    store.insert_category(&draft).await.unwrap();
    store.insert_category(&draft).await.unwrap();

    let rows = store
        .list_categories(&Filter::by_name("Racy"), Page::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn subcategory_get_by_absence_is_empty_not_an_error() {
    let store = MemoryStore::new();
    let missing = SubcategoryManager::new(&store)
        .get_by(&Filter::by_id(123))
        .await
        .unwrap();
    assert!(missing.is_none());
}
