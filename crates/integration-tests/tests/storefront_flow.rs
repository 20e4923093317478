//! Integration tests for the storefront controller over a file store.

use std::pin::pin;
use std::time::Duration;

use futures::StreamExt;

use kiddiebox_core::{Price, ProductId, UserRole};
use kiddiebox_integration_tests::TempDataDir;
use kiddiebox_storefront::recommend::APOLOGY_MESSAGE;
use kiddiebox_storefront::{AppError, View};

// =============================================================================
// Accounts & Sessions
// =============================================================================

#[test]
fn test_session_survives_restart() {
    let dir = TempDataDir::new();

    let mut app = dir.open_storefront();
    app.signup("Maya", "maya@example.com", Some("sunflower")).unwrap();
    drop(app);

    let app = dir.open_storefront();
    let user = app.current_user().unwrap();
    assert_eq!(user.email, "maya@example.com");
    assert_eq!(user.role, UserRole::Student);
    assert_eq!(app.view(), View::Home);
}

#[test]
fn test_logout_survives_restart() {
    let dir = TempDataDir::new();

    let mut app = dir.open_storefront();
    app.login("admin@login", "Admin@9235").unwrap();
    app.logout().unwrap();
    drop(app);

    let app = dir.open_storefront();
    assert!(app.current_user().is_none());
    assert_eq!(app.view(), View::Home);
}

#[test]
fn test_session_is_a_snapshot() {
    let dir = TempDataDir::new();

    let mut admin = dir.open_storefront();
    admin.login("admin@login", "Admin@9235").unwrap();
    let mut renamed = admin.current_user().unwrap().clone();
    renamed.name = "Head Admin".to_string();
    admin.save_user(renamed).unwrap();

    // The account changed, the stored session did not.
    assert!(admin.users().iter().any(|u| u.name == "Head Admin"));
    let restored = dir.open_storefront();
    assert_eq!(restored.current_user().unwrap().name, "Super Admin");
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_guest_to_buyer_flow() {
    let dir = TempDataDir::new();
    let mut app = dir.open_storefront();

    // Guests can fill a cart but not check out.
    app.add_to_cart(&ProductId::new("c2")).unwrap();
    app.add_to_cart(&ProductId::new("c2")).unwrap();
    assert_eq!(app.cart().len(), 2);
    assert!(matches!(app.checkout(), Err(AppError::Unauthorized(_))));

    app.login("user1", "321321").unwrap();
    assert_eq!(app.cart().len(), 2);
    assert_eq!(app.cart_total(), Price::from_cents(11998));

    let enrollments = app.checkout().unwrap();
    assert_eq!(enrollments.len(), 2);
    assert!(app.cart().is_empty());

    // Purchases are visible after a restart.
    let app = dir.open_storefront();
    let products = app.my_products().unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p.id.as_str() == "c2"));
}

#[test]
fn test_admin_sees_all_enrollments() {
    let dir = TempDataDir::new();
    let mut app = dir.open_storefront();

    app.login("user1", "321321").unwrap();
    app.add_to_cart(&ProductId::new("d1")).unwrap();
    app.checkout().unwrap();

    app.signup("Leo", "leo@example.com", None).unwrap();
    app.add_to_cart(&ProductId::new("d2")).unwrap();
    app.checkout().unwrap();
    assert_eq!(app.my_enrollments().unwrap().len(), 1);

    app.login("admin@login", "Admin@9235").unwrap();
    assert_eq!(app.all_enrollments().unwrap().len(), 2);
}

// =============================================================================
// Browse & Recommend
// =============================================================================

#[test]
fn test_browse_after_admin_edits() {
    let dir = TempDataDir::new();
    let mut app = dir.open_storefront();
    app.login("admin@login", "Admin@9235").unwrap();

    assert!(app.add_category("Music").unwrap());
    let mut product = app.product(&ProductId::new("c3")).unwrap().clone();
    product.category = "Music".into();
    app.save_product(product).unwrap();

    let app = dir.open_storefront();
    let music = app.browse(&"Music".into(), "");
    assert_eq!(music.len(), 1);
    assert_eq!(music[0].id.as_str(), "c3");
    assert!(app.browse(&"Creative Arts".into(), "").is_empty());
}

#[tokio::test]
async fn test_recommend_failure_is_masked() {
    let dir = TempDataDir::new();
    let app = dir.open_storefront();

    let rec = app.recommend("my 7 year old likes space").await.unwrap();
    assert_eq!(rec.message, APOLOGY_MESSAGE);
    assert!(rec.products.is_empty());
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_student_and_tutor_chat() {
    let dir = TempDataDir::new();

    let mut student = dir.open_storefront();
    student.login("user1", "321321").unwrap();
    student.send_chat_message("Hello, is a tutor online?").unwrap();

    let mut tutor = dir.open_storefront();
    tutor.login("tutor@login", "Admin@9235").unwrap();
    assert_eq!(tutor.view(), View::TutorConsole);
    assert!(tutor.poll_chat().unwrap());
    assert_eq!(tutor.chat_messages().len(), 1);

    tutor.send_chat_message("Yes! How can I help?").unwrap();

    let student = student.with_chat_poll_interval(Duration::from_millis(10));
    let mut snapshots = pin!(student.watch_chat());
    let log = snapshots.next().await.unwrap().unwrap();
    assert_eq!(log.len(), 2);
    assert!(!log[0].is_tutor);
    assert!(log[1].is_tutor);
    assert_eq!(log[1].sender_name, "Pro Tutor");
}
