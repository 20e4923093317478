//! In-memory shopping cart.
//!
//! The cart is never persisted: it is lost on logout or restart.

use kiddiebox_core::{CartItem, CartLineId, Price, Product, ProductId};

/// Shopping cart lines in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new line for `product`. Adding the same product twice yields
    /// two independent lines. Returns the new line.
    pub fn add(&mut self, product: Product) -> CartItem {
        let line = CartItem::new(product);
        self.items.push(line.clone());
        line
    }

    /// Remove the line with `cart_id`. Returns `true` if a line was removed.
    pub fn remove(&mut self, cart_id: &CartLineId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.cart_id != cart_id);
        self.items.len() != before
    }

    /// The cart lines.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the effective prices of all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items
            .iter()
            .map(|item| item.product.effective_price())
            .sum()
    }

    /// Product IDs of all lines, duplicates included.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items
            .iter()
            .map(|item| item.product.id.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::default_products;

    #[test]
    fn test_same_product_gets_separate_lines() {
        let products = default_products();
        let mut cart = Cart::new();

        let first = cart.add(products[0].clone()).cart_id.clone();
        let second = cart.add(products[0].clone()).cart_id.clone();
        assert_ne!(first, second);
        assert_eq!(cart.len(), 2);

        assert!(cart.remove(&first));
        assert!(!cart.remove(&first));
        assert_eq!(cart.items()[0].cart_id, second);
    }

    #[test]
    fn test_add_returns_the_new_line() {
        let products = default_products();
        let mut cart = Cart::new();
        cart.add(products[1].clone());

        let line = cart.add(products[2].clone());
        assert_eq!(line.product.id, ProductId::new("d1"));
        assert_eq!(cart.items().last(), Some(&line));
    }

    #[test]
    fn test_total_uses_effective_prices() {
        let products = default_products();
        let mut cart = Cart::new();
        // c1 is discounted to 29.99, c3 has no discount at 35.00
        cart.add(products[0].clone());
        cart.add(products[3].clone());

        assert_eq!(cart.total(), Price::from_cents(6499));
        assert_eq!(
            cart.product_ids(),
            vec![ProductId::new("c1"), ProductId::new("c3")]
        );
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::new().total(), Price::ZERO);
    }
}
