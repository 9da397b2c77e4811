#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{ActorSuggestion, Content, OutboxRecord, Recommendation, User};
use crate::error::SyncServiceError;

/// Durable store of pending/processed synchronization records.
pub trait OutboxStore: Send + Sync {
    /// Append a freshly created record. A separate write from the primary
    /// entity; producers swallow failures here (see usecase docs).
    async fn append(&self, record: &OutboxRecord) -> Result<Uuid, SyncServiceError>;

    /// All records with `processed = false AND retry_count < max_attempts`,
    /// in no guaranteed order.
    async fn find_pending(&self, max_attempts: i32) -> Result<Vec<OutboxRecord>, SyncServiceError>;

    /// Persist an updated record. A failed save loses this attempt's outcome
    /// and the record retries identically next cycle.
    async fn save(&self, record: &OutboxRecord) -> Result<(), SyncServiceError>;

    async fn list_recent(&self, limit: u64) -> Result<Vec<OutboxRecord>, SyncServiceError>;

    async fn list_quarantined(&self, limit: u64) -> Result<Vec<OutboxRecord>, SyncServiceError>;
}

/// Repository for document-store users.
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), SyncServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SyncServiceError>;
}

/// Repository for document-store contents.
pub trait ContentRepository: Send + Sync {
    async fn create(&self, content: &Content) -> Result<(), SyncServiceError>;
    /// Returns `true` if a row was deleted, `false` if none existed.
    async fn delete(&self, id: Uuid) -> Result<bool, SyncServiceError>;
}

/// Mutation port to the graph store. Upserts report the affected-node count
/// so callers can turn a silent no-op into a loud fault.
pub trait GraphStore: Send + Sync {
    async fn upsert_actor(
        &self,
        actor_id: &str,
        display_name: &str,
        kind: &str,
    ) -> Result<u64, SyncServiceError>;

    async fn upsert_content(&self, content_id: &str, title: &str)
    -> Result<u64, SyncServiceError>;

    /// Match-and-delete: an absent node is success, not an error.
    async fn delete_content(&self, content_id: &str) -> Result<(), SyncServiceError>;

    async fn merge_like_edge(
        &self,
        actor_id: &str,
        content_id: &str,
    ) -> Result<(), SyncServiceError>;

    async fn delete_like_edge(
        &self,
        actor_id: &str,
        content_id: &str,
    ) -> Result<(), SyncServiceError>;

    async fn merge_follow_edge(
        &self,
        follower_id: &str,
        creator_id: &str,
    ) -> Result<(), SyncServiceError>;

    async fn delete_follow_edge(
        &self,
        follower_id: &str,
        creator_id: &str,
    ) -> Result<(), SyncServiceError>;
}

/// Read-only graph traversals (follower lists, recommendations).
pub trait GraphReader: Send + Sync {
    async fn followers(&self, actor_id: &str) -> Result<Vec<String>, SyncServiceError>;

    async fn following(&self, actor_id: &str) -> Result<Vec<String>, SyncServiceError>;

    async fn content_recommendations(
        &self,
        actor_id: &str,
        limit: i64,
    ) -> Result<Vec<Recommendation>, SyncServiceError>;

    /// Friends-of-friends: actors followed by who you follow, minus those you
    /// already follow, ranked by mutual count.
    async fn actor_recommendations(
        &self,
        actor_id: &str,
        limit: i64,
    ) -> Result<Vec<ActorSuggestion>, SyncServiceError>;
}

/// In-memory store port: membership sets, counters and ranking aggregates.
/// The sets are the authoritative record of who liked/followed what.
pub trait EngagementStore: Send + Sync {
    /// Flip membership: add if absent (returns `true`), remove if present
    /// (returns `false`).
    async fn toggle_member(&self, set_key: &str, member: &str)
    -> Result<bool, SyncServiceError>;

    async fn is_member(&self, set_key: &str, member: &str) -> Result<bool, SyncServiceError>;

    async fn members(&self, set_key: &str) -> Result<Vec<String>, SyncServiceError>;

    async fn incr_counter(&self, key: &str, delta: i64) -> Result<i64, SyncServiceError>;

    async fn set_counter(&self, key: &str, value: i64) -> Result<(), SyncServiceError>;

    async fn get_counter(&self, key: &str) -> Result<i64, SyncServiceError>;

    async fn incr_score(
        &self,
        ranking_key: &str,
        member: &str,
        delta: f64,
    ) -> Result<(), SyncServiceError>;

    async fn score(&self, ranking_key: &str, member: &str)
    -> Result<Option<f64>, SyncServiceError>;

    /// Zero-based position from the top of the ranking, if ranked.
    async fn reverse_rank(
        &self,
        ranking_key: &str,
        member: &str,
    ) -> Result<Option<u64>, SyncServiceError>;
}
