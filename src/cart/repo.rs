use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Cart, CartItem, CartLine};

#[async_trait]
pub trait CartRepo: Send + Sync {
    async fn find_for_user(&self, user_id: Uuid) -> anyhow::Result<Option<Cart>>;
    /// Load the user's cart, creating it on first access.
    async fn first_or_create(&self, user_id: Uuid) -> anyhow::Result<Cart>;
    async fn find_item(&self, cart_id: Uuid, item_id: Uuid) -> anyhow::Result<Option<CartItem>>;
    /// Insert a line or add to the existing line for the product, touching the cart.
    /// `None` when the merged quantity would not fit in an `i32`; nothing is written then.
    async fn add_quantity(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> anyhow::Result<Option<CartItem>>;
    async fn set_quantity(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> anyhow::Result<Option<CartItem>>;
    async fn delete_item(&self, cart_id: Uuid, item_id: Uuid) -> anyhow::Result<bool>;
    async fn clear(&self, cart_id: Uuid) -> anyhow::Result<u64>;
    async fn lines(&self, cart_id: Uuid) -> anyhow::Result<Vec<CartLine>>;
}

#[derive(Clone)]
pub struct PgCartRepo {
    db: PgPool,
}

impl PgCartRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepo for PgCartRepo {
    async fn find_for_user(&self, user_id: Uuid) -> anyhow::Result<Option<Cart>> {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            SELECT id, user_id, created_at, updated_at
              FROM carts
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find cart")?;
        Ok(cart)
    }

    async fn first_or_create(&self, user_id: Uuid) -> anyhow::Result<Cart> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            INSERT INTO carts (id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .context("first_or_create cart")?;
        Ok(cart)
    }

    async fn find_item(&self, cart_id: Uuid, item_id: Uuid) -> anyhow::Result<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, cart_id, product_id, quantity, created_at, updated_at
              FROM cart_items
             WHERE id = $1 AND cart_id = $2
            "#,
        )
        .bind(item_id)
        .bind(cart_id)
        .fetch_optional(&self.db)
        .await
        .context("find cart item")?;
        Ok(item)
    }

    async fn add_quantity(
        &self,
        cart_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> anyhow::Result<Option<CartItem>> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        // The conflict arm locks the existing row, so concurrent adds sum up.
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (id, cart_id, product_id, quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity,
                          updated_at = now()
                    WHERE cart_items.quantity <= 2147483647 - EXCLUDED.quantity
            RETURNING id, cart_id, product_id, quantity, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&mut *tx)
        .await
        .context("add cart item quantity")?;

        let Some(item) = item else {
            tx.rollback().await.context("rollback tx")?;
            return Ok(None);
        };
        sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await
            .context("touch cart")?;
        tx.commit().await.context("commit tx")?;
        Ok(Some(item))
    }

    async fn set_quantity(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> anyhow::Result<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
               SET quantity = $3, updated_at = now()
             WHERE id = $1 AND cart_id = $2
            RETURNING id, cart_id, product_id, quantity, created_at, updated_at
            "#,
        )
        .bind(item_id)
        .bind(cart_id)
        .bind(quantity)
        .fetch_optional(&self.db)
        .await
        .context("set cart item quantity")?;
        Ok(item)
    }

    async fn delete_item(&self, cart_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND cart_id = $2")
            .bind(item_id)
            .bind(cart_id)
            .execute(&self.db)
            .await
            .context("delete cart item")?;
        Ok(res.rows_affected() > 0)
    }

    async fn clear(&self, cart_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.db)
            .await
            .context("clear cart")?;
        Ok(res.rows_affected())
    }

    async fn lines(&self, cart_id: Uuid) -> anyhow::Result<Vec<CartLine>> {
        let rows = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT ci.id, ci.product_id, p.name AS product_name,
                   p.price_cents AS unit_price_cents, ci.quantity
              FROM cart_items ci
              JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.created_at ASC
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.db)
        .await
        .context("list cart lines")?;
        Ok(rows)
    }
}
