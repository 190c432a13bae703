use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub otp_ttl_secs: u64,
    pub bcrypt_cost: u32,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_path: String,
    pub db_max_connections: u32,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            redis_url: redis_url_from_env(),
            jwt_secret: env::var("JWT_SECRET")?,
            access_token_ttl_secs: parse_or("ACCESS_TOKEN_TTL_SECS", 15 * 60),
            refresh_token_ttl_secs: parse_or("REFRESH_TOKEN_TTL_SECS", 24 * 3600),
            otp_ttl_secs: parse_or("OTP_TTL_SECS", 5 * 60),
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: parse_or("SERVER_PORT", 3000),
            api_base_path: env::var("API_BASE_PATH").unwrap_or_else(|_| "/api".into()),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10),
            run_migrations: parse_or("RUN_MIGRATIONS", false),
        })
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_ttl_secs)
    }

    pub fn otp_ttl(&self) -> Duration {
        Duration::from_secs(self.otp_ttl_secs)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `REDIS_URL` wins; otherwise the URL is assembled from host, port and password.
fn redis_url_from_env() -> String {
    if let Ok(url) = env::var("REDIS_URL") {
        return url;
    }
    let host = env::var("REDIS_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".into());
    redis_url(&host, &port, env::var("REDIS_PASS").ok().as_deref())
}

fn redis_url(host: &str, port: &str, password: Option<&str>) -> String {
    match password.filter(|p| !p.is_empty()) {
        Some(pass) => format!("redis://:{}@{}:{}/0", pass, host, port),
        None => format!("redis://{}:{}/0", host, port),
    }
}
