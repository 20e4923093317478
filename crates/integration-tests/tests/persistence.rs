//! Integration tests for the file-backed collections.

use kiddiebox_core::{Price, ProductId, UserId};
use kiddiebox_integration_tests::TempDataDir;
use kiddiebox_storefront::db::{
    CategoryRepository, ChatRepository, EnrollmentRepository, KeyValueStore, ProductRepository,
    SessionRepository, StorageError, init_db, keys,
};

// =============================================================================
// Seeding
// =============================================================================

#[test]
fn test_seed_writes_one_file_per_collection() {
    let dir = TempDataDir::new();
    let store = dir.store();

    let report = init_db(store.as_ref()).unwrap();
    assert_eq!(
        report.seeded,
        [keys::PRODUCTS, keys::USERS, keys::ENROLLMENTS, keys::CATEGORIES, keys::CONFIG]
    );

    for key in report.seeded {
        assert!(dir.path().join(format!("{key}.json")).exists(), "{key}");
    }
    // Chat and session are never seeded.
    assert!(!dir.path().join("kb_chat_messages.json").exists());
    assert!(!dir.path().join("kb_current_user.json").exists());
    assert!(ChatRepository::new(store.as_ref()).list().unwrap().is_empty());
    assert!(SessionRepository::new(store.as_ref()).get().unwrap().is_none());
}

#[test]
fn test_delete_then_reseed_keeps_deletion() {
    let dir = TempDataDir::new();
    let store = dir.store();
    init_db(store.as_ref()).unwrap();

    let products = ProductRepository::new(store.as_ref());
    let mut ids: Vec<String> = products
        .list()
        .unwrap()
        .into_iter()
        .map(|p| p.id.into_inner())
        .collect();
    ids.sort();
    assert_eq!(ids, ["c1", "c2", "c3", "c4", "d1", "d2"]);

    assert!(products.delete(&ProductId::new("c1")).unwrap());

    // Reopen from disk and seed again: the catalog is not restored.
    let reopened = dir.store();
    let report = init_db(reopened.as_ref()).unwrap();
    assert!(report.is_empty());

    let remaining: Vec<String> = ProductRepository::new(reopened.as_ref())
        .list()
        .unwrap()
        .into_iter()
        .map(|p| p.id.into_inner())
        .collect();
    assert_eq!(remaining.len(), 5);
    for id in ["c2", "c3", "c4", "d1", "d2"] {
        assert!(remaining.iter().any(|r| r == id), "{id} missing");
    }
}

#[test]
fn test_emptied_collection_is_not_reseeded() {
    let dir = TempDataDir::new();
    let store = dir.store();
    init_db(store.as_ref()).unwrap();

    let products = ProductRepository::new(store.as_ref());
    for product in products.list().unwrap() {
        products.delete(&product.id).unwrap();
    }

    init_db(store.as_ref()).unwrap();
    assert!(products.list().unwrap().is_empty());
}

#[test]
fn test_added_category_survives_reopen() {
    let dir = TempDataDir::new();
    init_db(dir.store().as_ref()).unwrap();

    assert!(
        CategoryRepository::new(dir.store().as_ref())
            .add("Music".into())
            .unwrap()
    );

    let categories = CategoryRepository::new(dir.store().as_ref()).list().unwrap();
    assert_eq!(categories.last().unwrap().as_str(), "Music");
    assert_eq!(categories.first().unwrap().as_str(), "All");
}

// =============================================================================
// Enrollments
// =============================================================================

#[test]
fn test_enroll_splits_total_across_products() {
    let dir = TempDataDir::new();
    let store = dir.store();
    let repo = EnrollmentRepository::new(store.as_ref());
    let user = UserId::new("user1");

    let created = repo
        .enroll(
            &user,
            &[ProductId::new("c1"), ProductId::new("c2"), ProductId::new("d1")],
            Price::from_cents(9000),
        )
        .unwrap();

    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|e| e.price_paid == Price::from_cents(3000)));
    assert!(created.iter().all(|e| e.user_id == user));
    assert!(created.iter().all(|e| e.purchase_date == created[0].purchase_date));

    let stored = EnrollmentRepository::new(dir.store().as_ref())
        .for_user(&user)
        .unwrap();
    assert_eq!(stored, created);
}

// =============================================================================
// Malformed Data
// =============================================================================

#[test]
fn test_malformed_collection_surfaces_deserialization_error() {
    let dir = TempDataDir::new();
    let store = dir.store();
    init_db(store.as_ref()).unwrap();

    std::fs::write(dir.path().join("kb_products.json"), "{\"not\": \"a list\"}").unwrap();

    let result = ProductRepository::new(store.as_ref()).list();
    assert!(matches!(
        result,
        Err(StorageError::Deserialization { ref key, .. }) if key == keys::PRODUCTS
    ));
}

#[test]
fn test_stored_json_uses_camel_case_fields() {
    let dir = TempDataDir::new();
    let store = dir.store();
    init_db(store.as_ref()).unwrap();

    let raw = store.get(keys::PRODUCTS).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];

    assert_eq!(first["id"], "c1");
    assert!(first.get("ageRange").is_some());
    assert!(first.get("discountPrice").is_some());
    assert_eq!(first["type"], "Course");
    assert!(first["price"].is_number());
}
