// Relational store: row types, error mapping and repositories.

pub mod errors;
pub mod models;
pub mod repositories;

pub use errors::{DbError, DbResult};
pub use repositories::{CrudRepository, DynRepository, Page, ProductSearch, UserRepository};
