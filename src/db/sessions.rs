use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{Cache, CacheKey},
    error::AppResult,
};

/// Maps opaque bearer tokens to user ids
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a session for a user, returning its token
    async fn create(&self, user_id: i64) -> AppResult<String>;

    /// User id behind a token, if the token is known and not expired
    async fn resolve(&self, token: &str) -> AppResult<Option<i64>>;

    async fn revoke(&self, token: &str) -> AppResult<()>;
}

fn new_token() -> String {
    Uuid::new_v4().to_string()
}

/// Sessions kept in Redis, expiring through key TTLs
#[derive(Clone)]
pub struct RedisSessions {
    cache: Cache,
    ttl_secs: u64,
}

impl RedisSessions {
    pub fn new(cache: Cache, ttl_secs: u64) -> Self {
        Self { cache, ttl_secs }
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessions {
    async fn create(&self, user_id: i64) -> AppResult<String> {
        let token = new_token();
        self.cache
            .set(&CacheKey::Session(token.clone()), &user_id, self.ttl_secs)
            .await?;
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> AppResult<Option<i64>> {
        self.cache
            .get_from_cache(&CacheKey::Session(token.to_string()))
            .await
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        self.cache
            .delete(&CacheKey::Session(token.to_string()))
            .await
    }
}

/// Sessions kept in process memory
pub struct MemorySessions {
    ttl: Duration,
    tokens: RwLock<HashMap<String, (i64, DateTime<Utc>)>>,
}

impl MemorySessions {
    /// A TTL too large for a chrono `Duration` is capped at the maximum
    pub fn new(ttl_secs: u64) -> Self {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessions {
    async fn create(&self, user_id: i64) -> AppResult<String> {
        let token = new_token();
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, (_, expiry)| *expiry > Utc::now());
        tokens.insert(token.clone(), (user_id, expires_at));
        Ok(token)
    }

    async fn resolve(&self, token: &str) -> AppResult<Option<i64>> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(token)
            .filter(|(_, expiry)| *expiry > Utc::now())
            .map(|(user_id, _)| *user_id))
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        self.tokens.write().await.remove(token);
        Ok(())
    }
}
