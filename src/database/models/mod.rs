pub mod category;
pub mod employee;
pub mod order;
pub mod product;
pub mod user;

pub use category::{Category, CategoryInput};
pub use employee::{Employee, EmployeeInput};
pub use order::{Order, OrderDetail, OrderDetailInput, OrderInput, OrderWithDetails};
pub use product::{Product, ProductInput};
pub use user::{NewUser, UserEntity};
