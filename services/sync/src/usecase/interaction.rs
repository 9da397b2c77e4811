use crate::domain::repository::{EngagementStore, GraphStore};
use crate::error::SyncServiceError;

pub const LIKES_RANKING_KEY: &str = "ranking:likes:global";
pub const FOLLOWS_RANKING_KEY: &str = "ranking:follows:global";

pub fn user_likes_key(user_id: &str) -> String {
    format!("user:likes:{user_id}")
}

pub fn likes_count_key(content_id: &str) -> String {
    format!("likes:count:{content_id}")
}

pub fn user_follows_key(user_id: &str) -> String {
    format!("user:follows:{user_id}")
}

pub fn followers_count_key(creator_id: &str) -> String {
    format!("followers:count:{creator_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// `true` when the toggle added the relationship, `false` when it removed it.
    pub added: bool,
    /// Aggregate count after the toggle.
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct LikeStats {
    pub count: i64,
    pub ranking_score: Option<f64>,
    pub ranking_position: Option<u64>,
}

/// Inline dual-write gateway for likes. The in-memory store is authoritative:
/// membership set first, then counter and ranking, each derived from whether
/// the membership actually changed (so replays never double-count). The graph
/// edge write is best-effort enrichment; its failure is logged and swallowed,
/// never propagated to the caller.
pub struct ToggleLikeUseCase<E: EngagementStore, G: GraphStore> {
    pub engagement: E,
    pub graph: G,
}

impl<E: EngagementStore, G: GraphStore> ToggleLikeUseCase<E, G> {
    pub async fn execute(
        &self,
        user_id: &str,
        content_id: &str,
    ) -> Result<ToggleOutcome, SyncServiceError> {
        let added = self
            .engagement
            .toggle_member(&user_likes_key(user_id), content_id)
            .await?;

        let count_key = likes_count_key(content_id);
        let count = if added {
            self.engagement.incr_counter(&count_key, 1).await?
        } else {
            let count = self.engagement.incr_counter(&count_key, -1).await?;
            if count < 0 {
                // Counter drift (e.g. flushed counter with surviving set
                // members) is repaired by clamping, never left negative.
                self.engagement.set_counter(&count_key, 0).await?;
                0
            } else {
                count
            }
        };

        let delta = if added { 1.0 } else { -1.0 };
        self.engagement
            .incr_score(LIKES_RANKING_KEY, content_id, delta)
            .await?;

        let edge = if added {
            self.graph.merge_like_edge(user_id, content_id).await
        } else {
            self.graph.delete_like_edge(user_id, content_id).await
        };
        if let Err(err) = edge {
            tracing::warn!(
                user_id,
                content_id,
                added,
                error = %err,
                "like edge write failed; in-memory state is authoritative"
            );
        }

        Ok(ToggleOutcome { added, count })
    }
}

/// Same gateway shape as likes, for follower relationships. Both sides key on
/// actor ids; the counter tracks the creator's follower total.
pub struct ToggleFollowUseCase<E: EngagementStore, G: GraphStore> {
    pub engagement: E,
    pub graph: G,
}

impl<E: EngagementStore, G: GraphStore> ToggleFollowUseCase<E, G> {
    pub async fn execute(
        &self,
        follower_id: &str,
        creator_id: &str,
    ) -> Result<ToggleOutcome, SyncServiceError> {
        if follower_id == creator_id {
            return Err(SyncServiceError::InvalidPayload(
                "an actor cannot follow itself".into(),
            ));
        }

        let added = self
            .engagement
            .toggle_member(&user_follows_key(follower_id), creator_id)
            .await?;

        let count_key = followers_count_key(creator_id);
        let count = if added {
            self.engagement.incr_counter(&count_key, 1).await?
        } else {
            let count = self.engagement.incr_counter(&count_key, -1).await?;
            if count < 0 {
                self.engagement.set_counter(&count_key, 0).await?;
                0
            } else {
                count
            }
        };

        let delta = if added { 1.0 } else { -1.0 };
        self.engagement
            .incr_score(FOLLOWS_RANKING_KEY, creator_id, delta)
            .await?;

        let edge = if added {
            self.graph.merge_follow_edge(follower_id, creator_id).await
        } else {
            self.graph.delete_follow_edge(follower_id, creator_id).await
        };
        if let Err(err) = edge {
            tracing::warn!(
                follower_id,
                creator_id,
                added,
                error = %err,
                "follow edge write failed; in-memory state is authoritative"
            );
        }

        Ok(ToggleOutcome { added, count })
    }
}

/// Read side of the engagement store.
pub struct EngagementQueries<E: EngagementStore> {
    pub engagement: E,
}

impl<E: EngagementStore> EngagementQueries<E> {
    pub async fn like_stats(&self, content_id: &str) -> Result<LikeStats, SyncServiceError> {
        let count = self
            .engagement
            .get_counter(&likes_count_key(content_id))
            .await?;
        let ranking_score = self.engagement.score(LIKES_RANKING_KEY, content_id).await?;
        // The store rank is zero-based; the reported position is one-based
        // (top content is position 1).
        let ranking_position = self
            .engagement
            .reverse_rank(LIKES_RANKING_KEY, content_id)
            .await?
            .map(|rank| rank + 1);
        Ok(LikeStats {
            count,
            ranking_score,
            ranking_position,
        })
    }

    pub async fn has_liked(
        &self,
        user_id: &str,
        content_id: &str,
    ) -> Result<bool, SyncServiceError> {
        self.engagement
            .is_member(&user_likes_key(user_id), content_id)
            .await
    }

    pub async fn liked_contents(&self, user_id: &str) -> Result<Vec<String>, SyncServiceError> {
        self.engagement.members(&user_likes_key(user_id)).await
    }
}
