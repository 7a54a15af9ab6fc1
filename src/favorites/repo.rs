use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::products::repo_types::Product;

#[async_trait]
pub trait FavoriteRepo: Send + Sync {
    async fn exists(&self, user_id: Uuid, product_id: Uuid) -> anyhow::Result<bool>;
    /// `true` when a new link was written.
    async fn attach(&self, user_id: Uuid, product_id: Uuid) -> anyhow::Result<bool>;
    /// `true` when a link was removed.
    async fn detach(&self, user_id: Uuid, product_id: Uuid) -> anyhow::Result<bool>;
    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<Product>>;
    async fn clear(&self, user_id: Uuid) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgFavoriteRepo {
    db: PgPool,
}

impl PgFavoriteRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepo for PgFavoriteRepo {
    async fn exists(&self, user_id: Uuid, product_id: Uuid) -> anyhow::Result<bool> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND product_id = $2)",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(&self.db)
        .await
        .context("check favorite")?;
        Ok(found)
    }

    async fn attach(&self, user_id: Uuid, product_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, product_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&self.db)
        .await
        .context("attach favorite")?;
        Ok(res.rows_affected() == 1)
    }

    async fn detach(&self, user_id: Uuid, product_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.db)
            .await
            .context("detach favorite")?;
        Ok(res.rows_affected() > 0)
    }

    async fn list(&self, user_id: Uuid) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price_cents, p.category_id,
                   c.name AS category_name, p.created_at, p.updated_at
              FROM favorites f
              JOIN products p ON p.id = f.product_id
              JOIN categories c ON c.id = p.category_id
             WHERE f.user_id = $1
             ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list favorites")?;
        Ok(rows)
    }

    async fn clear(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM favorites WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("clear favorites")?;
        Ok(res.rows_affected())
    }
}
