use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{
    ByCategoryProps, CreateProductRequest, ProductIndexProps, ShowProps, UpdateProductRequest,
};
use super::repo_types::Product;
use super::services;
use crate::{
    auth::AuthUser,
    error::HttpError,
    responses::{Envelope, Page},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/products", get(index).post(store))
        .route("/products/:id", get(show).patch(update).delete(destroy))
        .route("/categories/:id/products", get(by_category))
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
) -> Result<Json<Page<ProductIndexProps>>, HttpError> {
    let fail = HttpError::mapper(state.config.debug, "Failed to load products.");
    let products = services::get_all_products(&state).await.map_err(&fail)?;
    let categories = services::categories(&state).await.map_err(&fail)?;
    Ok(Json(Page::new(
        "Products/Index",
        ProductIndexProps { products, categories },
    )))
}

#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Page<ByCategoryProps>>, HttpError> {
    let products = services::get_products_by_category(&state, id)
        .await
        .map_err(HttpError::mapper(state.config.debug, "Failed to load products."))?;
    Ok(Json(Page::new(
        "Products/ByCategory",
        ByCategoryProps { products, category_id: id },
    )))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Page<ShowProps>>, HttpError> {
    let product = services::get_product_by_id(&state, id)
        .await
        .map_err(HttpError::mapper(state.config.debug, "Failed to load product."))?;
    Ok(Json(Page::new("Products/Show", ShowProps { product })))
}

#[instrument(skip(state, body))]
pub async fn store(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Envelope<Product>>), HttpError> {
    let product = services::create_product(&state, body)
        .await
        .map_err(HttpError::mapper(state.config.debug, "Failed to create product."))?;
    info!(%user_id, product_id = %product.id, "product created via api");

    let location = format!("/api/v1/products/{}", product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(Envelope::success("Product created successfully!", product)),
    ))
}

#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Envelope<Product>>, HttpError> {
    let product = services::update_product(&state, id, body)
        .await
        .map_err(HttpError::mapper(state.config.debug, "Failed to update product."))?;
    info!(%user_id, product_id = %id, "product updated via api");
    Ok(Json(Envelope::success("Product updated successfully!", product)))
}

#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, HttpError> {
    let deleted = services::delete_product(&state, id)
        .await
        .map_err(HttpError::mapper(state.config.debug, "Failed to delete product."))?;
    if !deleted {
        return Err(HttpError::new(StatusCode::NOT_FOUND, "Product not found."));
    }
    info!(%user_id, product_id = %id, "product deleted via api");
    Ok(Json(Envelope::done("Product deleted successfully!")))
}
