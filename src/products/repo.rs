use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::{CreateProductRequest, UpdateProductRequest};
use super::repo_types::{Category, Product};

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Product>>;
    async fn list_by_category(&self, category_id: Uuid) -> anyhow::Result<Vec<Product>>;
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Product>>;
    async fn insert(&self, new: &CreateProductRequest) -> anyhow::Result<Product>;
    async fn update(&self, id: Uuid, patch: &UpdateProductRequest) -> anyhow::Result<Option<Product>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn categories(&self) -> anyhow::Result<Vec<Category>>;
    async fn find_category(&self, id: Uuid) -> anyhow::Result<Option<Category>>;
}

#[derive(Clone)]
pub struct PgProductRepo {
    db: PgPool,
}

impl PgProductRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepo for PgProductRepo {
    async fn list(&self) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price_cents, p.category_id,
                   c.name AS category_name, p.created_at, p.updated_at
              FROM products p
              JOIN categories c ON c.id = p.category_id
             ORDER BY p.name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list products")?;
        Ok(rows)
    }

    async fn list_by_category(&self, category_id: Uuid) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price_cents, p.category_id,
                   c.name AS category_name, p.created_at, p.updated_at
              FROM products p
              JOIN categories c ON c.id = p.category_id
             WHERE p.category_id = $1
             ORDER BY p.name ASC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.db)
        .await
        .context("list products by category")?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price_cents, p.category_id,
                   c.name AS category_name, p.created_at, p.updated_at
              FROM products p
              JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find product")?;
        Ok(row)
    }

    async fn insert(&self, new: &CreateProductRequest) -> anyhow::Result<Product> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            WITH p AS (
                INSERT INTO products (id, name, description, price_cents, category_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT p.id, p.name, p.description, p.price_cents, p.category_id,
                   c.name AS category_name, p.created_at, p.updated_at
              FROM p
              JOIN categories c ON c.id = p.category_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price_cents)
        .bind(new.category_id)
        .fetch_one(&self.db)
        .await
        .context("insert product")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: &UpdateProductRequest) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            WITH p AS (
                UPDATE products
                   SET name = COALESCE($2, name),
                       description = CASE WHEN $3::text IS NULL THEN description
                                          ELSE NULLIF($3, '') END,
                       price_cents = COALESCE($4, price_cents),
                       category_id = COALESCE($5, category_id),
                       updated_at = now()
                 WHERE id = $1
                RETURNING *
            )
            SELECT p.id, p.name, p.description, p.price_cents, p.category_id,
                   c.name AS category_name, p.created_at, p.updated_at
              FROM p
              JOIN categories c ON c.id = p.category_id
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.price_cents)
        .bind(patch.category_id)
        .fetch_optional(&self.db)
        .await
        .context("update product")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete product")?;
        Ok(res.rows_affected() > 0)
    }

    async fn categories(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
            .fetch_all(&self.db)
            .await
            .context("list categories")?;
        Ok(rows)
    }

    async fn find_category(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find category")?;
        Ok(row)
    }
}
