pub mod memory;
pub mod pg_store;
pub mod postgres;
pub mod redis;
pub mod sessions;
pub mod store;

pub use memory::MemoryStore;
pub use pg_store::PgStore;
pub use postgres::{create_pool, run_migrations};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use redis::CacheWriterHandle;
pub use sessions::{MemorySessions, RedisSessions, SessionStore};
pub use store::Store;
