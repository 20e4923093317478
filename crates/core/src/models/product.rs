//! Catalog products and cart lines.

use serde::{Deserialize, Serialize};

use super::Category;
use crate::types::{CartLineId, Price, ProductId, ProductType};

/// A course or digital product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID (e.g. `c1`, `d2`).
    pub id: ProductId,
    pub title: String,
    pub instructor: String,
    /// List price.
    pub price: Price,
    /// Sale price, charged instead of `price` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    /// Image URL.
    pub image: String,
    /// Preview video link (usually `YouTube`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Download link for digital products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub description: String,
    pub category: Category,
    /// Free-text age range, e.g. `"2-4"` or `"8-12"`.
    pub age_range: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    /// Ordered lesson titles. Only meaningful for courses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syllabus: Option<Vec<String>>,
    pub rating: f64,
    /// Number of reviews.
    pub reviews: u32,
}

impl Product {
    /// The price charged at checkout: the discount price if set, else the list price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whether this product is a course.
    #[must_use]
    pub fn is_course(&self) -> bool {
        self.product_type == ProductType::Course
    }
}

/// A line in the shopping cart.
///
/// Each line carries its own `cart_id`, so the same product may appear on
/// several independent lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub cart_id: CartLineId,
}

impl CartItem {
    /// Create a new cart line for a product with a freshly generated line ID.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            cart_id: CartLineId::generate(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new("c3"),
            title: "Little Picasso: Drawing Basics".to_string(),
            instructor: "Arty Anna".to_string(),
            price: Price::from_cents(3500),
            discount_price: None,
            image: "https://picsum.photos/400/300?random=4".to_string(),
            video_url: None,
            download_url: None,
            description: "Step-by-step drawing lessons.".to_string(),
            category: Category::from("Creative Arts"),
            age_range: "4-8".to_string(),
            product_type: ProductType::Course,
            syllabus: Some(vec!["Shapes into Animals".to_string()]),
            rating: 4.7,
            reviews: 210,
        }
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        let mut product = sample();
        assert_eq!(product.effective_price(), Price::from_cents(3500));

        product.discount_price = Some(Price::from_cents(1999));
        assert_eq!(product.effective_price(), Price::from_cents(1999));
    }

    #[test]
    fn test_product_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "Course");
        assert_eq!(json["ageRange"], "4-8");
        assert!(json.get("discountPrice").is_none());
    }

    #[test]
    fn test_parse_stored_product() {
        let json = r#"{
            "id": "d1",
            "title": "Dinosaur Math Workbook (PDF)",
            "instructor": "KiddieMath Team",
            "price": 15.00,
            "discountPrice": 9.99,
            "image": "https://picsum.photos/400/300?random=3",
            "description": "Printable math worksheets.",
            "category": "Digital Workbooks",
            "ageRange": "5-7",
            "type": "Digital Product",
            "rating": 4.5,
            "reviews": 45
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.product_type, ProductType::Digital);
        assert_eq!(product.effective_price(), Price::from_cents(999));
        assert!(product.syllabus.is_none());
    }

    #[test]
    fn test_cart_item_flattens_product() {
        let item = CartItem::new(sample());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "c3");
        assert!(json["cartId"].as_str().unwrap().starts_with("cart_"));
    }
}
