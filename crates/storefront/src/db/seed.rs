//! Default data and first-run seeding.
//!
//! Seeding only writes a collection whose key is wholly absent. Existing
//! data, even an empty list, is never merged or overwritten.

use tracing::{info, instrument};

use kiddiebox_core::{
    AppConfig, Category, Enrollment, Price, Product, ProductId, ProductType, User, UserId, UserRole,
};

use super::{KeyValueStore, StorageError, keys, write_json};

/// Collections written by one [`init_db`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Keys that were absent and have been seeded.
    pub seeded: Vec<&'static str>,
}

impl SeedReport {
    /// Whether anything was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeded.is_empty()
    }
}

/// Seed every absent collection with its default value.
///
/// Products, users, enrollments, categories, and settings are seeded. The
/// chat log and the session are left absent; both read as empty.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
#[instrument(skip(store))]
pub fn init_db<S: KeyValueStore + ?Sized>(store: &S) -> Result<SeedReport, StorageError> {
    let mut report = SeedReport::default();

    seed_if_absent(store, keys::PRODUCTS, &default_products(), &mut report)?;
    seed_if_absent(store, keys::USERS, &default_users(), &mut report)?;
    seed_if_absent(store, keys::ENROLLMENTS, &[] as &[Enrollment], &mut report)?;
    seed_if_absent(store, keys::CATEGORIES, &default_categories(), &mut report)?;
    seed_if_absent(store, keys::CONFIG, &AppConfig::default(), &mut report)?;

    if report.is_empty() {
        info!("All collections present, nothing seeded");
    } else {
        info!(seeded = ?report.seeded, "Seeded default collections");
    }
    Ok(report)
}

fn seed_if_absent<S, T>(
    store: &S,
    key: &'static str,
    value: &T,
    report: &mut SeedReport,
) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
    T: serde::Serialize + ?Sized,
{
    if store.contains(key)? {
        return Ok(());
    }
    write_json(store, key, value)?;
    report.seeded.push(key);
    Ok(())
}

/// Default category list, starting with the [`Category::ALL`] filter sentinel.
#[must_use]
pub fn default_categories() -> Vec<Category> {
    [
        Category::ALL,
        "Early Learning (2-5)",
        "Creative Arts",
        "STEM & Coding",
        "Languages",
        "Digital Workbooks",
    ]
    .into_iter()
    .map(Category::from)
    .collect()
}

/// Starter accounts: one per staff role plus a sample student.
#[must_use]
pub fn default_users() -> Vec<User> {
    let staff_password = "Admin@9235";
    vec![
        seed_user(
            "admin1",
            "Super Admin",
            "admin@login",
            staff_password,
            UserRole::Admin,
            "000&color=fff",
        ),
        seed_user(
            "tutor1",
            "Pro Tutor",
            "tutor@login",
            staff_password,
            UserRole::Tutor,
            "7C3AED&color=fff",
        ),
        seed_user(
            "partner1",
            "Affiliate Partner",
            "partner@login",
            staff_password,
            UserRole::Partner,
            "059669&color=fff",
        ),
        seed_user(
            "user1",
            "Sample User",
            "user1",
            "321321",
            UserRole::Student,
            "2563EB&color=fff",
        ),
    ]
}

fn seed_user(
    id: &str,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
    colors: &str,
) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        role,
        password: Some(password.to_string()),
        avatar: Some(format!(
            "https://ui-avatars.com/api/?name={}&background={colors}",
            name.replace(' ', "+")
        )),
    }
}

/// Starter catalog: four courses and two digital products.
#[must_use]
pub fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("c1"),
            title: "Toddler Phonics Adventure".to_string(),
            instructor: "Ms. Sarah".to_string(),
            price: Price::from_cents(4999),
            discount_price: Some(Price::from_cents(2999)),
            image: picsum(1),
            video_url: None,
            download_url: None,
            description: "A fun, musical journey through the alphabet for ages 2-4. \
                          Learn sounds, letters, and first words."
                .to_string(),
            category: Category::from("Early Learning (2-5)"),
            age_range: "2-4".to_string(),
            product_type: ProductType::Course,
            syllabus: Some(lessons(&[
                "Meet the Letter A",
                "Bouncing B Sounds",
                "Sing-along C",
                "Review A-C",
            ])),
            rating: 4.8,
            reviews: 124,
        },
        Product {
            id: ProductId::new("c2"),
            title: "Scratch Programming for Kids".to_string(),
            instructor: "CodeWizard Mike".to_string(),
            price: Price::from_cents(8999),
            discount_price: Some(Price::from_cents(5999)),
            image: picsum(2),
            video_url: None,
            download_url: None,
            description: "Create your own games and animations using Scratch! \
                          Perfect for beginners aged 8-12."
                .to_string(),
            category: Category::from("STEM & Coding"),
            age_range: "8-12".to_string(),
            product_type: ProductType::Course,
            syllabus: Some(lessons(&[
                "Intro to Scratch",
                "Making a Sprite Move",
                "Loops and Events",
                "Build Your First Game",
            ])),
            rating: 4.9,
            reviews: 89,
        },
        Product {
            id: ProductId::new("d1"),
            title: "Dinosaur Math Workbook (PDF)".to_string(),
            instructor: "KiddieMath Team".to_string(),
            price: Price::from_cents(1500),
            discount_price: Some(Price::from_cents(999)),
            image: picsum(3),
            video_url: None,
            download_url: None,
            description: "Printable math worksheets with a dinosaur theme. \
                          Covers addition, subtraction, and shapes."
                .to_string(),
            category: Category::from("Digital Workbooks"),
            age_range: "5-7".to_string(),
            product_type: ProductType::Digital,
            syllabus: None,
            rating: 4.5,
            reviews: 45,
        },
        Product {
            id: ProductId::new("c3"),
            title: "Little Picasso: Drawing Basics".to_string(),
            instructor: "Arty Anna".to_string(),
            price: Price::from_cents(3500),
            discount_price: None,
            image: picsum(4),
            video_url: None,
            download_url: None,
            description: "Step-by-step drawing lessons for little hands. \
                          Animals, cartoons, and nature."
                .to_string(),
            category: Category::from("Creative Arts"),
            age_range: "4-8".to_string(),
            product_type: ProductType::Course,
            syllabus: Some(lessons(&[
                "Shapes into Animals",
                "Drawing Faces",
                "Coloring Techniques",
                "My Masterpiece",
            ])),
            rating: 4.7,
            reviews: 210,
        },
        Product {
            id: ProductId::new("c4"),
            title: "Space Explorers: Solar System".to_string(),
            instructor: "Astro Alex".to_string(),
            price: Price::from_cents(4500),
            discount_price: None,
            image: picsum(5),
            video_url: None,
            download_url: None,
            description: "Blast off into space! Learn about planets, stars, and rockets."
                .to_string(),
            category: Category::from("STEM & Coding"),
            age_range: "6-9".to_string(),
            product_type: ProductType::Course,
            syllabus: Some(lessons(&[
                "The Sun",
                "Rocky Planets",
                "Gas Giants",
                "Build a Rocket Model",
            ])),
            rating: 4.8,
            reviews: 67,
        },
        Product {
            id: ProductId::new("d2"),
            title: "Storytime Starter Pack (E-book)".to_string(),
            instructor: "Storyteller Jane".to_string(),
            price: Price::from_cents(1200),
            discount_price: None,
            image: picsum(6),
            video_url: None,
            download_url: None,
            description: "A collection of 5 illustrated short stories for bedtime reading."
                .to_string(),
            category: Category::from("Languages"),
            age_range: "3-6".to_string(),
            product_type: ProductType::Digital,
            syllabus: None,
            rating: 4.9,
            reviews: 320,
        },
    ]
}

fn picsum(n: u8) -> String {
    format!("https://picsum.photos/400/300?random={n}")
}

fn lessons(titles: &[&str]) -> Vec<String> {
    titles.iter().map(ToString::to_string).collect()
}
