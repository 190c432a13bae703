use std::sync::Arc;

use config::Config;
use database::models::{
    Category, CategoryInput, Employee, EmployeeInput, Order, OrderInput, OrderWithDetails,
    Product, ProductInput,
};
use database::{DynRepository, ProductSearch};
use services::AuthService;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

/// Shared per-request state. Stores sit behind trait objects so tests can
/// swap in in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: Arc<AuthService>,
    pub employees: DynRepository<Employee, Employee, EmployeeInput>,
    pub categories: DynRepository<Category, Category, CategoryInput>,
    pub products: DynRepository<Product, Product, ProductInput>,
    pub product_search: Arc<dyn ProductSearch>,
    pub orders: DynRepository<Order, OrderWithDetails, OrderInput>,
}
