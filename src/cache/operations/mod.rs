pub mod session;

pub use session::RedisSessionCache;
