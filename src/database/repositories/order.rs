use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::{CrudRepository, Page};
use crate::database::errors::{DbError, DbResult};
use crate::database::models::{Order, OrderDetail, OrderDetailInput, OrderInput, OrderWithDetails};

const ORDER_COLUMNS: &str = "order_id, customer_id, employee_id, order_date, required_date, \
     shipped_date, ship_via, freight, ship_name, ship_address, ship_city, ship_region, \
     ship_postal_code, ship_country";

/// Orders and their line items. Every write runs in a single transaction;
/// dropping an uncommitted `Transaction` rolls it back.
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_details(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i32,
        details: &[OrderDetailInput],
    ) -> DbResult<Vec<OrderDetail>> {
        let mut inserted = Vec::with_capacity(details.len());
        for detail in details {
            let row = sqlx::query_as::<_, OrderDetail>(
                r#"
                INSERT INTO order_details (order_id, product_id, unit_price, quantity, discount)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING order_id, product_id, unit_price, quantity, discount
                "#,
            )
            .bind(order_id)
            .bind(detail.product_id)
            .bind(detail.unit_price)
            .bind(detail.quantity)
            .bind(detail.discount)
            .fetch_one(&mut **tx)
            .await?;
            inserted.push(row);
        }
        Ok(inserted)
    }
}

#[async_trait]
impl CrudRepository for PgOrderRepository {
    type Entity = Order;
    type Detail = OrderWithDetails;
    type Input = OrderInput;

    async fn list(&self, page: Page) -> DbResult<(Vec<Order>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((orders, total))
    }

    async fn get(&self, id: i32) -> DbResult<OrderWithDetails> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)?;

        let details = sqlx::query_as::<_, OrderDetail>(
            r#"
            SELECT order_id, product_id, unit_price, quantity, discount
            FROM order_details
            WHERE order_id = $1
            ORDER BY product_id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(OrderWithDetails { order, details })
    }

    async fn create(&self, input: &OrderInput) -> DbResult<OrderWithDetails> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (
                customer_id, employee_id, order_date, required_date, shipped_date, ship_via,
                freight, ship_name, ship_address, ship_city, ship_region, ship_postal_code,
                ship_country
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&input.customer_id)
        .bind(input.employee_id)
        .bind(input.order_date)
        .bind(input.required_date)
        .bind(input.shipped_date)
        .bind(input.ship_via)
        .bind(input.freight)
        .bind(&input.ship_name)
        .bind(&input.ship_address)
        .bind(&input.ship_city)
        .bind(&input.ship_region)
        .bind(&input.ship_postal_code)
        .bind(&input.ship_country)
        .fetch_one(&mut *tx)
        .await?;

        let details = Self::insert_details(&mut tx, order.order_id, &input.order_details).await?;

        tx.commit().await?;
        tracing::info!(
            "Created order {} with {} line items",
            order.order_id,
            details.len()
        );

        Ok(OrderWithDetails { order, details })
    }

    async fn update(&self, id: i32, input: &OrderInput) -> DbResult<OrderWithDetails> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET customer_id = $1, employee_id = $2, order_date = $3, required_date = $4,
                shipped_date = $5, ship_via = $6, freight = $7, ship_name = $8,
                ship_address = $9, ship_city = $10, ship_region = $11,
                ship_postal_code = $12, ship_country = $13
            WHERE order_id = $14
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&input.customer_id)
        .bind(input.employee_id)
        .bind(input.order_date)
        .bind(input.required_date)
        .bind(input.shipped_date)
        .bind(input.ship_via)
        .bind(input.freight)
        .bind(&input.ship_name)
        .bind(&input.ship_address)
        .bind(&input.ship_city)
        .bind(&input.ship_region)
        .bind(&input.ship_postal_code)
        .bind(&input.ship_country)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DbError::NotFound)?;

        sqlx::query("DELETE FROM order_details WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let details = Self::insert_details(&mut tx, id, &input.order_details).await?;

        tx.commit().await?;
        Ok(OrderWithDetails { order, details })
    }

    async fn delete(&self, id: i32) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_details WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
