//! In-memory filtering and sorting of listings.

use crate::catalog::Product;
use crate::search::{ProductQuery, SortOption};
use std::cmp::Ordering;

/// Check whether `product` passes the text and category filters of `query`.
pub fn matches(product: &Product, query: &ProductQuery) -> bool {
    let text_ok = query
        .search_text()
        .map_or(true, |text| product.matches_text(text));
    let category_ok = query
        .category
        .as_deref()
        .map_or(true, |category| product.in_category(category));
    text_ok && category_ok
}

/// Filter `products` by `query` and sort the survivors.
pub fn filter_products<'a, I>(products: I, query: &ProductQuery) -> Vec<Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut found: Vec<Product> = products
        .into_iter()
        .filter(|p| matches(p, query))
        .cloned()
        .collect();
    sort_products(&mut found, query.sort);
    found
}

/// Sort in place. Stable, so equal keys keep their incoming order.
pub fn sort_products(products: &mut [Product], sort: SortOption) {
    match sort {
        SortOption::Listed => {}
        // Unknown listing dates sort last.
        SortOption::Newest => products.sort_by(|a, b| match (a.listed_at, b.listed_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortOption::PriceAsc => products.sort_by_key(|p| p.price),
        SortOption::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::TitleAsc => {
            products.sort_by_cached_key(|p| p.title.to_lowercase());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::{TimeZone, Utc};

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("1", "Engineering Physics", Money::from_minor(35_000))
                .with_category("Books")
                .with_listed_at(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            Product::new("2", "Graph Calculator", Money::from_minor(150_000))
                .with_category("Electronics")
                .with_description("Great for physics labs")
                .with_listed_at(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            Product::new("3", "apron", Money::from_minor(20_000)).with_category("Lab Equipment"),
            Product::new("4", "Bicycle", Money::from_minor(500_000))
                .with_category("Cycle")
                .with_listed_at(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()),
        ]
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_unfiltered_keeps_source_order() {
        let found = filter_products(&catalog(), &ProductQuery::new());
        assert_eq!(ids(&found), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_newest_first_with_undated_last() {
        let query = ProductQuery::new().with_sort(SortOption::Newest);
        let found = filter_products(&catalog(), &query);
        assert_eq!(ids(&found), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_text_matches_title_or_description() {
        let found = filter_products(&catalog(), &ProductQuery::new().with_search("PHYSICS"));
        assert_eq!(ids(&found), vec!["2", "1"]);
    }

    #[test]
    fn test_category_filter() {
        let query = ProductQuery::new().with_category("books");
        let found = filter_products(&catalog(), &query);
        assert_eq!(ids(&found), vec!["1"]);
    }

    #[test]
    fn test_text_and_category_combine() {
        let query = ProductQuery::new()
            .with_search("physics")
            .with_category("Electronics");
        let found = filter_products(&catalog(), &query);
        assert_eq!(ids(&found), vec!["2"]);
    }

    #[test]
    fn test_price_and_title_sorts() {
        let products = catalog();

        let asc = filter_products(&products, &ProductQuery::new().with_sort(SortOption::PriceAsc));
        assert_eq!(ids(&asc), vec!["3", "1", "2", "4"]);

        let desc = filter_products(&products, &ProductQuery::new().with_sort(SortOption::PriceDesc));
        assert_eq!(ids(&desc), vec!["4", "2", "1", "3"]);

        let title = filter_products(&products, &ProductQuery::new().with_sort(SortOption::TitleAsc));
        assert_eq!(ids(&title), vec!["3", "4", "1", "2"]);
    }
}
