//! Redis-backed session state (per-session visit counter)

use redis::Client;

use crate::{
    config::SessionConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct SessionService {
    client: Client,
    ttl_seconds: u64,
}

impl SessionService {
    /// Create the service and check the Redis connection
    pub async fn new(url: &str, config: &SessionConfig) -> AppResult<Self> {
        let service = Self::lazy(url, config)?;
        service.ping().await?;
        Ok(service)
    }

    /// Create the service without contacting Redis
    pub fn lazy(url: &str, config: &SessionConfig) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;
        Ok(Self {
            client,
            ttl_seconds: config.ttl_seconds,
        })
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }

    /// Count one more visit for the session and return the new total.
    /// The counter lives as long as the session.
    pub async fn record_visit(&self, session_id: &str) -> AppResult<i64> {
        let mut conn = self.connection().await?;
        let key = visits_key(session_id);

        let (visits,): (i64,) = redis::pipe()
            .atomic()
            .incr(&key, 1)
            .expire(&key, self.ttl_seconds as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to count visit in Redis: {}", e)))?;

        Ok(visits)
    }

    /// Ping Redis
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis ping failed: {}", e)))?;
        Ok(())
    }
}

fn visits_key(session_id: &str) -> String {
    format!("session:{}:visits", session_id)
}
