use async_trait::async_trait;
use sqlx::PgPool;

use super::{CrudRepository, Page};
use crate::database::errors::{DbError, DbResult};
use crate::database::models::{Product, ProductInput};

const PRODUCT_COLUMNS: &str = "product_id, product_name, supplier_id, category_id, \
     quantity_per_unit, unit_price, units_in_stock, units_on_order, reorder_level, discontinued";

/// Name lookup on the product table.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Case-insensitive substring match on `product_name`.
    async fn search_by_name(&self, name: &str, page: Page) -> DbResult<(Vec<Product>, i64)>;
}

/// Escapes LIKE metacharacters so user input only ever matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository for PgProductRepository {
    type Entity = Product;
    type Detail = Product;
    type Input = ProductInput;

    async fn list(&self, page: Page) -> DbResult<(Vec<Product>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY product_id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((products, total))
    }

    async fn get(&self, id: i32) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn create(&self, input: &ProductInput) -> DbResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                product_name, supplier_id, category_id, quantity_per_unit, unit_price,
                units_in_stock, units_on_order, reorder_level, discontinued
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&input.product_name)
        .bind(input.supplier_id)
        .bind(input.category_id)
        .bind(&input.quantity_per_unit)
        .bind(input.unit_price)
        .bind(input.units_in_stock)
        .bind(input.units_on_order)
        .bind(input.reorder_level)
        .bind(input.discontinued)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created product {}", product.product_id);
        Ok(product)
    }

    async fn update(&self, id: i32, input: &ProductInput) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET product_name = $1, supplier_id = $2, category_id = $3, quantity_per_unit = $4,
                unit_price = $5, units_in_stock = $6, units_on_order = $7, reorder_level = $8,
                discontinued = $9
            WHERE product_id = $10
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&input.product_name)
        .bind(input.supplier_id)
        .bind(input.category_id)
        .bind(&input.quantity_per_unit)
        .bind(input.unit_price)
        .bind(input.units_in_stock)
        .bind(input.units_on_order)
        .bind(input.reorder_level)
        .bind(input.discontinued)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: i32) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ProductSearch for PgProductRepository {
    async fn search_by_name(&self, name: &str, page: Page) -> DbResult<(Vec<Product>, i64)> {
        let pattern = format!("%{}%", escape_like(name));

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE product_name ILIKE $1 ESCAPE '\\'")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE product_name ILIKE $1 ESCAPE '\'
            ORDER BY product_id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&pattern)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((products, total))
    }
}
