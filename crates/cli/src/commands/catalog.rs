//! Catalog and recommendation commands.

use tracing::info;

use kiddiebox_core::{Category, Product, ProductId};
use kiddiebox_storefront::AppError;

use super::App;

fn log_product_row(product: &Product) {
    let price = match product.discount_price {
        Some(sale) => format!("{sale} (was {})", product.price),
        None => product.price.to_string(),
    };
    info!(
        "{:<4} {:<38} {:<22} ages {:<5} {}",
        product.id.as_str(),
        product.title,
        product.category.as_str(),
        product.age_range,
        price
    );
}

/// List products, optionally filtered by category and search text.
pub fn list(app: &App, category: Option<&str>, search: Option<&str>) {
    let category = category.map_or_else(Category::all, Category::from);
    let products = app.browse(&category, search.unwrap_or_default());

    if products.is_empty() {
        info!("No products found");
        return;
    }
    for product in products {
        log_product_row(product);
    }
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product does not exist.
pub fn show(app: &App, id: &str) -> Result<(), AppError> {
    let product = app
        .product(&ProductId::new(id))
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found.")))?;

    info!("{} ({})", product.title, product.product_type);
    info!("  Instructor: {}", product.instructor);
    info!("  Category:   {}", product.category);
    info!("  Ages:       {}", product.age_range);
    info!("  Price:      {}", product.effective_price());
    info!("  Rating:     {} ({} reviews)", product.rating, product.reviews);
    info!("  {}", product.description);
    if let Some(url) = &product.video_url {
        info!("  Preview:    {url}");
    }
    if let Some(syllabus) = &product.syllabus {
        for (n, lesson) in syllabus.iter().enumerate() {
            info!("  {:>2}. {lesson}", n + 1);
        }
    }
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns `AppError::Forbidden` unless signed in as an admin.
pub fn delete(app: &mut App, id: &str) -> Result<(), AppError> {
    if app.delete_product(&ProductId::new(id))? {
        info!("Deleted product {id}");
    } else {
        info!("No product {id}, nothing deleted");
    }
    Ok(())
}

/// List categories.
pub fn list_categories(app: &App) {
    for category in app.categories() {
        info!("{category}");
    }
}

/// Add a category.
///
/// # Errors
///
/// Returns `AppError::Forbidden` unless signed in as an admin.
pub fn add_category(app: &mut App, name: &str) -> Result<(), AppError> {
    if app.add_category(name)? {
        info!("Added category {}", name.trim());
    } else {
        info!("Category {} already exists", name.trim());
    }
    Ok(())
}

/// Ask the assistant for recommendations.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the query is blank.
pub async fn recommend(app: &App, query: &str) -> Result<(), AppError> {
    let recommended = app.recommend(query).await?;

    info!("{}", recommended.message);
    for product in &recommended.products {
        log_product_row(product);
    }
    Ok(())
}
