use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors},
    routes::{
        self,
        category::Categories,
        crud,
        employee::Employees,
        order::Orders,
        product::{self, Products},
    },
};

/// Public auth endpoints.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(routes::auth::login))
        .route("/register", post(routes::auth::register))
        .route("/refresh", post(routes::auth::refresh))
        .route("/send-otp", post(routes::auth::send_otp))
        .route("/verify-otp", post(routes::auth::verify_otp))
        .route("/reset-password", post(routes::auth::reset_password))
}

/// Everything behind the bearer-token gate.
fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .route("/products/search", get(product::search))
        .merge(crud::routes::<Employees>())
        .merge(crud::routes::<Categories>())
        .merge(crud::routes::<Products>())
        .merge(crud::routes::<Orders>())
        .layer(from_fn_with_state(state.clone(), auth_middleware))
}

/// Full application router, nested under the configured base path.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state));

    let base = state.config.api_base_path.trim().trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else if base.starts_with('/') {
        Router::new().nest(base, api)
    } else {
        Router::new().nest(&format!("/{}", base), api)
    };

    router
        .layer(ServiceBuilder::new().layer(from_fn(log_errors)))
        .with_state(state)
}
