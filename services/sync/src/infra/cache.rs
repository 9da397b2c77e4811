use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::EngagementStore;
use crate::error::SyncServiceError;

/// Redis-backed engagement store: sets for membership, plain counters for
/// totals, sorted sets for rankings.
#[derive(Clone)]
pub struct RedisEngagementStore {
    pub pool: Pool,
}

impl RedisEngagementStore {
    async fn conn(&self) -> Result<deadpool_redis::Connection, SyncServiceError> {
        self.pool.get().await.map_err(SyncServiceError::storage)
    }
}

impl EngagementStore for RedisEngagementStore {
    async fn toggle_member(
        &self,
        set_key: &str,
        member: &str,
    ) -> Result<bool, SyncServiceError> {
        let mut conn = self.conn().await?;
        // SADD reports whether the member was new; an existing member means
        // this toggle removes it.
        let added: i64 = conn
            .sadd(set_key, member)
            .await
            .map_err(SyncServiceError::storage)?;
        if added == 1 {
            return Ok(true);
        }
        let (): () = conn
            .srem(set_key, member)
            .await
            .map_err(SyncServiceError::storage)?;
        Ok(false)
    }

    async fn is_member(&self, set_key: &str, member: &str) -> Result<bool, SyncServiceError> {
        let mut conn = self.conn().await?;
        conn.sismember(set_key, member)
            .await
            .map_err(SyncServiceError::storage)
    }

    async fn members(&self, set_key: &str) -> Result<Vec<String>, SyncServiceError> {
        let mut conn = self.conn().await?;
        conn.smembers(set_key)
            .await
            .map_err(SyncServiceError::storage)
    }

    async fn incr_counter(&self, key: &str, delta: i64) -> Result<i64, SyncServiceError> {
        let mut conn = self.conn().await?;
        conn.incr(key, delta)
            .await
            .map_err(SyncServiceError::storage)
    }

    async fn set_counter(&self, key: &str, value: i64) -> Result<(), SyncServiceError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .set(key, value)
            .await
            .map_err(SyncServiceError::storage)?;
        Ok(())
    }

    async fn get_counter(&self, key: &str) -> Result<i64, SyncServiceError> {
        let mut conn = self.conn().await?;
        let value: Option<i64> = conn.get(key).await.map_err(SyncServiceError::storage)?;
        Ok(value.unwrap_or(0))
    }

    async fn incr_score(
        &self,
        ranking_key: &str,
        member: &str,
        delta: f64,
    ) -> Result<(), SyncServiceError> {
        let mut conn = self.conn().await?;
        let _: f64 = conn
            .zincr(ranking_key, member, delta)
            .await
            .map_err(SyncServiceError::storage)?;
        Ok(())
    }

    async fn score(
        &self,
        ranking_key: &str,
        member: &str,
    ) -> Result<Option<f64>, SyncServiceError> {
        let mut conn = self.conn().await?;
        conn.zscore(ranking_key, member)
            .await
            .map_err(SyncServiceError::storage)
    }

    async fn reverse_rank(
        &self,
        ranking_key: &str,
        member: &str,
    ) -> Result<Option<u64>, SyncServiceError> {
        let mut conn = self.conn().await?;
        conn.zrevrank(ranking_key, member)
            .await
            .map_err(SyncServiceError::storage)
    }
}
