use std::sync::Arc;

use sqlx::PgPool;

use crate::cart::repo::{CartRepo, PgCartRepo};
use crate::config::AppConfig;
use crate::events::EventBus;
use crate::favorites::repo::{FavoriteRepo, PgFavoriteRepo};
use crate::products::repo::{PgProductRepo, ProductRepo};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub carts: Arc<dyn CartRepo>,
    pub favorites: Arc<dyn FavoriteRepo>,
    pub products: Arc<dyn ProductRepo>,
    pub events: EventBus,
}

impl AppState {
    pub fn from_pool(config: Arc<AppConfig>, db: PgPool) -> Self {
        let events = EventBus::new(config.event_buffer);
        Self {
            carts: Arc::new(PgCartRepo::new(db.clone())) as Arc<dyn CartRepo>,
            favorites: Arc::new(PgFavoriteRepo::new(db.clone())) as Arc<dyn FavoriteRepo>,
            products: Arc::new(PgProductRepo::new(db)) as Arc<dyn ProductRepo>,
            config,
            events,
        }
    }

    /// State backed by an in-memory store, plus a handle for seeding it.
    #[cfg(test)]
    pub fn fake() -> (Self, Arc<crate::testing::MemoryStore>) {
        let store = Arc::new(crate::testing::MemoryStore::default());
        let config = Arc::new(crate::testing::test_config());
        let state = Self {
            events: EventBus::new(config.event_buffer),
            config,
            carts: store.clone() as Arc<dyn CartRepo>,
            favorites: store.clone() as Arc<dyn FavoriteRepo>,
            products: store.clone() as Arc<dyn ProductRepo>,
        };
        (state, store)
    }
}
