use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{CreateProductRequest, UpdateProductRequest};
use super::repo_types::{Category, Product};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_NAME_LEN: usize = 255;

pub async fn get_all_products(st: &AppState) -> AppResult<Vec<Product>> {
    Ok(st.products.list().await?)
}

pub async fn categories(st: &AppState) -> AppResult<Vec<Category>> {
    Ok(st.products.categories().await?)
}

pub async fn get_products_by_category(st: &AppState, category_id: Uuid) -> AppResult<Vec<Product>> {
    require_category(st, category_id).await?;
    Ok(st.products.list_by_category(category_id).await?)
}

pub async fn get_product_by_id(st: &AppState, id: Uuid) -> AppResult<Product> {
    st.products.find(id).await?.ok_or_else(|| {
        warn!(product_id = %id, "product not found");
        AppError::not_found("Product not found.")
    })
}

pub async fn create_product(st: &AppState, req: CreateProductRequest) -> AppResult<Product> {
    let req = CreateProductRequest {
        name: clean_name(&req.name)?,
        description: clean_description(req.description),
        price_cents: check_price(req.price_cents)?,
        category_id: req.category_id,
    };
    require_category(st, req.category_id).await?;

    let product = st.products.insert(&req).await?;
    info!(product_id = %product.id, name = %product.name, "product created");
    Ok(product)
}

pub async fn update_product(st: &AppState, id: Uuid, patch: UpdateProductRequest) -> AppResult<Product> {
    let patch = UpdateProductRequest {
        name: patch.name.as_deref().map(clean_name).transpose()?,
        // An empty description clears it.
        description: patch.description.map(|d| d.trim().to_string()),
        price_cents: patch.price_cents.map(check_price).transpose()?,
        category_id: patch.category_id,
    };
    if let Some(category_id) = patch.category_id {
        require_category(st, category_id).await?;
    }

    let product = st.products.update(id, &patch).await?.ok_or_else(|| {
        warn!(product_id = %id, "update of missing product");
        AppError::not_found("Product not found.")
    })?;
    info!(product_id = %id, "product updated");
    Ok(product)
}

/// `false` when there was nothing to delete.
pub async fn delete_product(st: &AppState, id: Uuid) -> AppResult<bool> {
    let deleted = st.products.delete(id).await?;
    if deleted {
        info!(product_id = %id, "product deleted");
    } else {
        warn!(product_id = %id, "delete of missing product");
    }
    Ok(deleted)
}

async fn require_category(st: &AppState, id: Uuid) -> AppResult<Category> {
    st.products
        .find_category(id)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found."))
}

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Product name is required."));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation("Product name is too long."));
    }
    Ok(name.to_string())
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn check_price(price_cents: i64) -> AppResult<i64> {
    if price_cents < 0 {
        return Err(AppError::validation("Price must not be negative."));
    }
    Ok(price_cents)
}
