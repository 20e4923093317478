//! Purchase records linking users to products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EnrollmentId, Price, ProductId, UserId};

/// A user's purchase of one product.
///
/// `price_paid` is the transaction total divided evenly across the items
/// bought together, not the product's own price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub purchase_date: DateTime<Utc>,
    pub price_paid: Price,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_timestamp() {
        let json = r#"{
            "id": "e_1700000000000_abc123xyz",
            "userId": "user1",
            "productId": "c2",
            "purchaseDate": "2024-03-01T10:15:30.000Z",
            "pricePaid": 29.995
        }"#;

        let enrollment: Enrollment = serde_json::from_str(json).unwrap();
        assert_eq!(enrollment.user_id, UserId::new("user1"));
        assert_eq!(enrollment.purchase_date.timestamp(), 1_709_288_130);
    }
}
