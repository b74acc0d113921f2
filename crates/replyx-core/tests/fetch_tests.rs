#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{production_settings, responder_with};
use replyx_core::fetch::{PageQuery, RecordSource, SortOrder};
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Serialize)]
struct Product {
    id: i64,
    name: String,
    status: String,
}

#[derive(Debug, Serialize)]
struct ProductPage {
    items: Vec<Product>,
    per_page: u32,
    sort_by: String,
    sort_order: SortOrder,
}

struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    fn new() -> Self {
        let products = (1..=20)
            .map(|id| Product {
                id,
                name: format!("Product {}", id),
                status: if id % 2 == 0 { "active" } else { "archived" }.to_string(),
            })
            .collect();
        Self { products }
    }
}

impl RecordSource for Catalog {
    type Record = Product;
    type Page = ProductPage;

    fn find(&self, id: i64) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    fn paginate(&self, query: &PageQuery) -> ProductPage {
        let mut items: Vec<Product> = self
            .products
            .iter()
            .filter(|p| match &query.status {
                Some(statuses) => statuses.contains(&json!(p.status)),
                None => true,
            })
            .cloned()
            .collect();
        if query.sort_order == SortOrder::Desc {
            items.reverse();
        }
        items.truncate(query.per_page as usize);

        ProductPage {
            items,
            per_page: query.per_page,
            sort_by: query.sort_by.clone(),
            sort_order: query.sort_order,
        }
    }
}

fn inputs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_fetch_page_defaults() {
    let (responder, sink) = responder_with(production_settings());

    let envelope = responder.fetch_page(&Catalog::new(), &Map::new());

    assert!(envelope.result);
    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.message, "Data fetched successfully");
    assert_eq!(envelope.data["per_page"], json!(15));
    assert_eq!(envelope.data["sort_by"], json!("id"));
    assert_eq!(envelope.data["sort_order"], json!("DESC"));
    assert_eq!(envelope.data["items"].as_array().unwrap().len(), 15);
    assert_eq!(envelope.data["items"][0]["id"], json!(20));
    assert!(sink.is_empty());
}

#[test]
fn test_fetch_page_with_filters() {
    let (responder, _) = responder_with(production_settings());

    let envelope = responder.fetch_page(
        &Catalog::new(),
        &inputs(json!({"status": ["active"], "sort_order": "asc", "per_page": "3"})),
    );

    let items = envelope.data["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["id"], json!(2));
    assert!(items.iter().all(|p| p["status"] == json!("active")));
}

#[test]
fn test_fetch_by_id_found() {
    let (responder, sink) = responder_with(production_settings());

    let envelope = responder.fetch_by_id(&Catalog::new(), 7, None);

    assert!(envelope.result);
    assert_eq!(envelope.message, "Record fetched successfully");
    assert_eq!(envelope.data["name"], json!("Product 7"));
    assert!(sink.is_empty());
}

#[test]
fn test_fetch_by_id_missing_is_logged_404() {
    let (responder, sink) = responder_with(production_settings());

    let envelope = responder.fetch_by_id(&Catalog::new(), 404, None);
    assert!(!envelope.result);
    assert_eq!(envelope.status_code, 404);
    assert_eq!(envelope.message, "Record not found");
    assert_eq!(envelope.data, json!([]));
    assert_eq!(sink.len(), 1);

    let custom = responder.fetch_by_id(&Catalog::new(), 99, Some("Product not found"));
    assert_eq!(custom.message, "Product not found");
    assert_eq!(sink.len(), 2);
}
