use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{delete, get, patch, post},
    Json, Router,
};
use tokio_stream::{Stream, StreamExt};
use tracing::{instrument, warn};
use uuid::Uuid;

use super::dto::{AddCartItemRequest, CartPageProps, CartResource, UpdateCartItemRequest};
use super::services;
use crate::{
    auth::AuthUser,
    error::HttpError,
    events::{CartEvent, ItemData},
    responses::{Envelope, Page},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(index))
        .route("/cart/add", post(add_item))
        .route("/cart/update/:id", patch(update_item))
        .route("/cart/remove/:id", delete(remove_item))
        .route("/cart/clear", delete(clear_all))
        .route("/cart/events", get(events))
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Page<CartPageProps>>, HttpError> {
    let cart = services::show(&state, user_id)
        .await
        .map_err(HttpError::mapper(state.config.debug, "Failed to load cart."))?;
    Ok(Json(Page::new("Cart", CartPageProps { cart })))
}

#[instrument(skip(state, body))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddCartItemRequest>,
) -> Result<Json<Envelope<CartResource>>, HttpError> {
    let item = ItemData {
        product_id: body.product_id,
        quantity: body.quantity,
    };
    let cart = services::add_item(&state, user_id, body).await.map_err(HttpError::mapper(
        state.config.debug,
        "Failed to add item to cart. Please try again.",
    ))?;

    state.events.publish(CartEvent::ItemAdded {
        user_id,
        item,
        cart_count: cart.items_count,
    });
    Ok(Json(Envelope::success("Item added to cart successfully!", cart)))
}

#[instrument(skip(state, body))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCartItemRequest>,
) -> Result<Json<Envelope<CartResource>>, HttpError> {
    let cart = services::update_item(&state, user_id, id, body.quantity)
        .await
        .map_err(HttpError::mapper(state.config.debug, "Failed to update item."))?;

    if let Some(line) = cart.items.iter().find(|l| l.id == id) {
        state.events.publish(CartEvent::ItemUpdated {
            user_id,
            item: ItemData {
                product_id: line.product_id,
                quantity: line.quantity,
            },
            cart_count: cart.items_count,
        });
    }
    Ok(Json(Envelope::success("Cart updated successfully!", cart)))
}

#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<CartResource>>, HttpError> {
    let cart = services::remove_item(&state, user_id, id).await.map_err(HttpError::mapper(
        state.config.debug,
        "Failed to remove item from cart. Please try again.",
    ))?;

    state.events.publish(CartEvent::ItemRemoved {
        user_id,
        cart_count: cart.items_count,
    });
    Ok(Json(Envelope::success("Item removed from cart successfully!", cart)))
}

#[instrument(skip(state))]
pub async fn clear_all(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Envelope<CartResource>>, HttpError> {
    let cart = services::clear_all(&state, user_id)
        .await
        .map_err(HttpError::mapper(state.config.debug, "Failed to clear cart."))?;

    state.events.publish(CartEvent::CartCleared { user_id });
    Ok(Json(Envelope::success("Cart cleared successfully!", cart)))
}

/// Server-sent stream of the caller's cart notifications.
#[instrument(skip(state))]
pub async fn events(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state.events.user_stream(user_id).filter_map(|msg| {
        match Event::default().event(msg.event).json_data(&msg) {
            Ok(event) => Some(Ok::<_, Infallible>(event)),
            Err(e) => {
                warn!(error = %e, event = msg.event, "cart event not encodable");
                None
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
