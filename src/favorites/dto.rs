use serde::Serialize;
use uuid::Uuid;

use crate::products::repo_types::{Category, Product};

#[derive(Debug, Serialize)]
pub struct FavoritesPageProps {
    pub favorites: Vec<Product>,
    pub categories: Vec<Category>,
    pub cart_items_count: i64,
}

#[derive(Debug, Serialize)]
pub struct FavoriteStatus {
    pub product_id: Uuid,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct ClearedFavorites {
    pub removed: u64,
}
