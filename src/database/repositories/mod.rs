//! Data access traits and their Postgres implementations.
//!
//! Every resource table is reached through [`CrudRepository`]; the user table
//! has its own [`UserRepository`] because the auth flow needs lookups by
//! identifier rather than paging.

use std::sync::Arc;

use async_trait::async_trait;

use crate::database::errors::DbResult;

pub mod category;
pub mod employee;
pub mod order;
pub mod product;
pub mod user;

pub use category::PgCategoryRepository;
pub use employee::PgEmployeeRepository;
pub use order::PgOrderRepository;
pub use product::{PgProductRepository, ProductSearch};
pub use user::{PgUserRepository, UserRepository};

/// Offset pagination window. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    /// Saturates instead of overflowing; an out-of-range page just reads past the end.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Uniform list/get/create/update/delete contract for one table.
///
/// `Entity` is the list item, `Detail` what single-item operations return
/// (the same type except for orders, which carry their line items).
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Entity: Send;
    type Detail: Send;
    type Input: Send + Sync;

    /// One page of rows ordered by primary key, plus the total row count.
    async fn list(&self, page: Page) -> DbResult<(Vec<Self::Entity>, i64)>;

    async fn get(&self, id: i32) -> DbResult<Self::Detail>;

    async fn create(&self, input: &Self::Input) -> DbResult<Self::Detail>;

    async fn update(&self, id: i32, input: &Self::Input) -> DbResult<Self::Detail>;

    async fn delete(&self, id: i32) -> DbResult<()>;
}

pub type DynRepository<E, D, I> = Arc<dyn CrudRepository<Entity = E, Detail = D, Input = I>>;
