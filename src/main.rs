use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use northwind_backend::{
    AppState,
    cache::RedisSessionCache,
    config::Config,
    database::repositories::{
        PgCategoryRepository, PgEmployeeRepository, PgOrderRepository, PgProductRepository,
        PgUserRepository,
    },
    router::build_router,
    services::AuthService,
    utils::TokenIssuer,
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'northwind_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        tracing::info!("Database migrations applied");
    }

    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let session_cache = RedisSessionCache::new(Arc::new(redis_client));
    match session_cache.ping().await {
        Ok(reply) => tracing::info!("Redis reachable: {}", reply),
        Err(e) => tracing::warn!("Redis ping failed, continuing: {}", e),
    }

    let auth = AuthService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(session_cache),
        Arc::new(TokenIssuer::from_config(&config)),
        config.bcrypt_cost,
        config.otp_ttl(),
    );
    let products = Arc::new(PgProductRepository::new(pool.clone()));

    let state = AppState {
        config: config.clone(),
        auth: Arc::new(auth),
        employees: Arc::new(PgEmployeeRepository::new(pool.clone())),
        categories: Arc::new(PgCategoryRepository::new(pool.clone())),
        products: products.clone(),
        product_search: products,
        orders: Arc::new(PgOrderRepository::new(pool)),
    };

    let router = build_router(state);

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
