//! Catalog filtering.

use kiddiebox_core::{Category, Product};

/// Products in `category` whose title or description contains `query`.
///
/// The `All` category disables the category filter. The query match is a
/// case-insensitive substring match; an empty query matches everything.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    category: &Category,
    query: &str,
) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();

    products
        .iter()
        .filter(|p| category.is_all() || &p.category == category)
        .filter(|p| {
            needle.is_empty()
                || p.title.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::default_products;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_all_category_without_query() {
        let products = default_products();
        assert_eq!(
            filter_products(&products, &Category::all(), "").len(),
            products.len()
        );
    }

    #[test]
    fn test_category_filter() {
        let products = default_products();
        let found = filter_products(&products, &Category::from("STEM & Coding"), "");
        assert_eq!(ids(&found), ["c2", "c4"]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let products = default_products();
        let found = filter_products(&products, &Category::all(), "SCRATCH");
        assert_eq!(ids(&found), ["c2"]);
    }

    #[test]
    fn test_category_and_query_combine() {
        let products = default_products();
        let found = filter_products(&products, &Category::from("Languages"), "scratch");
        assert!(found.is_empty());
    }
}
