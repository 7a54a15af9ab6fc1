use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{ClearedFavorites, FavoriteStatus, FavoritesPageProps};
use super::services;
use crate::{
    auth::AuthUser,
    cart,
    error::HttpError,
    products,
    responses::{Envelope, Page},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(index))
        .route("/favorites/add/:product", post(add_favorite))
        .route(
            "/favorites/remove/:product",
            delete(remove_favorite).post(remove_favorite),
        )
        .route("/favorites/clear", delete(clear))
        .route("/favorites/check/:product", get(check))
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Page<FavoritesPageProps>>, HttpError> {
    let fail = HttpError::mapper(state.config.debug, "Failed to load favorites.");
    let favorites = services::get_user_favorites(&state, user_id).await.map_err(&fail)?;
    let categories = products::services::categories(&state).await.map_err(&fail)?;
    let cart_items_count = cart::services::item_count(&state, user_id).await.map_err(&fail)?;
    Ok(Json(Page::new(
        "Favorites",
        FavoritesPageProps {
            favorites,
            categories,
            cart_items_count,
        },
    )))
}

#[instrument(skip(state))]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(product): Path<Uuid>,
) -> Result<Json<Envelope<()>>, HttpError> {
    let added = services::add(&state, product, user_id).await.map_err(HttpError::mapper(
        state.config.debug,
        "Failed to add to favorites. Please try again.",
    ))?;
    Ok(Json(if added {
        Envelope::done("Added to favorites!")
    } else {
        Envelope::info("Product is already in favorites.")
    }))
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(product): Path<Uuid>,
) -> Result<Json<Envelope<()>>, HttpError> {
    let removed = services::remove_favorite(&state, product, user_id)
        .await
        .map_err(HttpError::mapper(
            state.config.debug,
            "Failed to remove from favorites. Please try again.",
        ))?;
    Ok(Json(if removed {
        Envelope::done("Removed from favorites!")
    } else {
        Envelope::info("Product was not in favorites.")
    }))
}

#[instrument(skip(state))]
pub async fn clear(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Envelope<ClearedFavorites>>, HttpError> {
    let removed = services::clear_all_favorites(&state, user_id)
        .await
        .map_err(HttpError::mapper(
            state.config.debug,
            "Failed to clear favorites. Please try again.",
        ))?;
    Ok(Json(Envelope::success(
        "All favorites cleared!",
        ClearedFavorites { removed },
    )))
}

#[instrument(skip(state))]
pub async fn check(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(product): Path<Uuid>,
) -> Result<Json<FavoriteStatus>, HttpError> {
    let is_favorite = services::is_favorite(&state, product, user_id)
        .await
        .map_err(HttpError::mapper(state.config.debug, "Failed to check favorite."))?;
    Ok(Json(FavoriteStatus {
        product_id: product,
        is_favorite,
    }))
}
