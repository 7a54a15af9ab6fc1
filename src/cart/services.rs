use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{AddCartItemRequest, CartResource};
use super::repo_types::Cart;
use crate::error::{AppError, AppResult};
use crate::products;
use crate::state::AppState;

/// The caller's cart with its lines, created on first access.
pub async fn show(st: &AppState, user_id: Uuid) -> AppResult<CartResource> {
    let cart = st.carts.first_or_create(user_id).await?;
    load(st, &cart).await
}

/// Add `quantity` of a product, merging into an existing line for that product.
pub async fn add_item(st: &AppState, user_id: Uuid, req: AddCartItemRequest) -> AppResult<CartResource> {
    check_quantity(req.quantity)?;
    products::services::get_product_by_id(st, req.product_id).await?;

    let cart = st.carts.first_or_create(user_id).await?;
    let item = st
        .carts
        .add_quantity(cart.id, req.product_id, req.quantity)
        .await?
        .ok_or_else(|| {
            warn!(%user_id, product_id = %req.product_id, "cart line quantity overflow");
            AppError::validation("Quantity is too large.")
        })?;
    info!(%user_id, cart_id = %cart.id, product_id = %item.product_id, quantity = item.quantity, "item added to cart");
    load(st, &cart).await
}

pub async fn update_item(
    st: &AppState,
    user_id: Uuid,
    item_id: Uuid,
    quantity: i32,
) -> AppResult<CartResource> {
    check_quantity(quantity)?;
    let cart = owned_cart(st, user_id, item_id).await?;
    st.carts
        .set_quantity(cart.id, item_id, quantity)
        .await?
        .ok_or_else(|| item_not_found(user_id, item_id))?;
    info!(%user_id, %item_id, quantity, "cart item updated");
    load(st, &cart).await
}

/// Fails with not-found, leaving the cart untouched, if the line is not the caller's.
pub async fn remove_item(st: &AppState, user_id: Uuid, item_id: Uuid) -> AppResult<CartResource> {
    let cart = owned_cart(st, user_id, item_id).await?;
    if !st.carts.delete_item(cart.id, item_id).await? {
        return Err(item_not_found(user_id, item_id));
    }
    info!(%user_id, %item_id, "cart item removed");
    load(st, &cart).await
}

/// Delete every line; the cart itself is kept.
pub async fn clear_all(st: &AppState, user_id: Uuid) -> AppResult<CartResource> {
    let cart = st.carts.first_or_create(user_id).await?;
    let removed = st.carts.clear(cart.id).await?;
    info!(%user_id, cart_id = %cart.id, removed, "cart cleared");
    load(st, &cart).await
}

/// Total quantity across the caller's lines; zero without a cart.
pub async fn item_count(st: &AppState, user_id: Uuid) -> AppResult<i64> {
    let Some(cart) = st.carts.find_for_user(user_id).await? else {
        return Ok(0);
    };
    let lines = st.carts.lines(cart.id).await?;
    Ok(lines.iter().map(|l| i64::from(l.quantity)).sum())
}

async fn owned_cart(st: &AppState, user_id: Uuid, item_id: Uuid) -> AppResult<Cart> {
    let cart = st
        .carts
        .find_for_user(user_id)
        .await?
        .ok_or_else(|| item_not_found(user_id, item_id))?;
    st.carts
        .find_item(cart.id, item_id)
        .await?
        .ok_or_else(|| item_not_found(user_id, item_id))?;
    Ok(cart)
}

async fn load(st: &AppState, cart: &Cart) -> AppResult<CartResource> {
    let lines = st.carts.lines(cart.id).await?;
    Ok(CartResource::new(cart, lines))
}

fn check_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 1 {
        return Err(AppError::validation("Quantity must be at least 1."));
    }
    Ok(())
}

fn item_not_found(user_id: Uuid, item_id: Uuid) -> AppError {
    warn!(%user_id, %item_id, "cart item not found");
    AppError::not_found("Cart item not found.")
}
