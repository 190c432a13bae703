mod auth;
mod error_handler;

pub use auth::{AuthSession, auth_middleware};
pub use error_handler::log_errors;
