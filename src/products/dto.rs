use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{Category, Product};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: Uuid,
}

/// Absent fields are left unchanged; an empty `description` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ProductIndexProps {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct ByCategoryProps {
    pub products: Vec<Product>,
    pub category_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ShowProps {
    pub product: Product,
}
