use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::products::{self, repo_types::Product};
use crate::state::AppState;

/// Idempotent; `false` if the product was already a favorite.
pub async fn add(st: &AppState, product_id: Uuid, user_id: Uuid) -> AppResult<bool> {
    products::services::get_product_by_id(st, product_id).await?;
    let added = st.favorites.attach(user_id, product_id).await?;
    info!(%user_id, %product_id, added, "favorite add");
    Ok(added)
}

/// Idempotent; `false` if the product was not a favorite.
pub async fn remove_favorite(st: &AppState, product_id: Uuid, user_id: Uuid) -> AppResult<bool> {
    products::services::get_product_by_id(st, product_id).await?;
    let removed = st.favorites.detach(user_id, product_id).await?;
    info!(%user_id, %product_id, removed, "favorite remove");
    Ok(removed)
}

pub async fn is_favorite(st: &AppState, product_id: Uuid, user_id: Uuid) -> AppResult<bool> {
    Ok(st.favorites.exists(user_id, product_id).await?)
}

pub async fn get_user_favorites(st: &AppState, user_id: Uuid) -> AppResult<Vec<Product>> {
    Ok(st.favorites.list(user_id).await?)
}

pub async fn clear_all_favorites(st: &AppState, user_id: Uuid) -> AppResult<u64> {
    let removed = st.favorites.clear(user_id).await?;
    info!(%user_id, removed, "favorites cleared");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn add_is_idempotent() {
        let (st, store) = AppState::fake();
        let pizza = store.add_category("Pizza");
        let p = store.add_product("Margherita", 1000, pizza.id);
        let user = store.add_user();

        assert!(add(&st, p.id, user).await.unwrap());
        assert!(!add(&st, p.id, user).await.unwrap());
        assert!(is_favorite(&st, p.id, user).await.unwrap());
        assert_eq!(get_user_favorites(&st, user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let (st, store) = AppState::fake();
        let pizza = store.add_category("Pizza");
        let p = store.add_product("Margherita", 1000, pizza.id);
        let user = store.add_user();

        assert!(!remove_favorite(&st, p.id, user).await.unwrap());
        add(&st, p.id, user).await.unwrap();
        assert!(remove_favorite(&st, p.id, user).await.unwrap());
        assert!(!remove_favorite(&st, p.id, user).await.unwrap());
        assert!(!is_favorite(&st, p.id, user).await.unwrap());
    }

    #[tokio::test]
    async fn listing_returns_only_callers_products() {
        let (st, store) = AppState::fake();
        let sushi = store.add_category("Sushi");
        let a = store.add_product("Nigiri", 500, sushi.id);
        let b = store.add_product("Sashimi", 700, sushi.id);
        let alice = store.add_user();
        let bob = store.add_user();

        add(&st, a.id, alice).await.unwrap();
        add(&st, b.id, bob).await.unwrap();

        let mine = get_user_favorites(&st, alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, a.id);
        assert_eq!(mine[0].category_name, "Sushi");
    }

    #[tokio::test]
    async fn clear_only_touches_caller() {
        let (st, store) = AppState::fake();
        let rolls = store.add_category("Rolls");
        let a = store.add_product("California", 900, rolls.id);
        let b = store.add_product("Dragon", 1500, rolls.id);
        let alice = store.add_user();
        let bob = store.add_user();
        add(&st, a.id, alice).await.unwrap();
        add(&st, b.id, alice).await.unwrap();
        add(&st, a.id, bob).await.unwrap();

        assert_eq!(clear_all_favorites(&st, alice).await.unwrap(), 2);
        assert!(get_user_favorites(&st, alice).await.unwrap().is_empty());
        assert_eq!(get_user_favorites(&st, bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (st, store) = AppState::fake();
        let user = store.add_user();
        let err = add(&st, Uuid::new_v4(), user).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
