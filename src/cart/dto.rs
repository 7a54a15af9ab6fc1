use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{Cart, CartLine};

#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineResource {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

/// The cart as clients see it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartResource {
    pub id: Uuid,
    pub items: Vec<CartLineResource>,
    pub items_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
}

impl CartResource {
    pub fn new(cart: &Cart, lines: Vec<CartLine>) -> Self {
        let items: Vec<CartLineResource> = lines
            .into_iter()
            .map(|l| CartLineResource {
                line_total_cents: l.unit_price_cents * i64::from(l.quantity),
                id: l.id,
                product_id: l.product_id,
                product_name: l.product_name,
                unit_price_cents: l.unit_price_cents,
                quantity: l.quantity,
            })
            .collect();
        Self {
            id: cart.id,
            items_count: items.len(),
            total_quantity: items.iter().map(|i| i64::from(i.quantity)).sum(),
            total_cents: items.iter().map(|i| i.line_total_cents).sum(),
            items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartPageProps {
    pub cart: CartResource,
}
