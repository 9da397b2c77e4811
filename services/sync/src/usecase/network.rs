use crate::domain::repository::GraphReader;
use crate::domain::types::{ActorSuggestion, Recommendation};
use crate::error::SyncServiceError;

pub const DEFAULT_RECOMMENDATION_LIMIT: i64 = 10;

/// Graph read surface: follower lists and the "liked by actors you follow"
/// recommendation traversal. Pure reads, no document-store involvement.
pub struct NetworkQueries<G: GraphReader> {
    pub graph: G,
}

impl<G: GraphReader> NetworkQueries<G> {
    pub async fn followers(&self, actor_id: &str) -> Result<Vec<String>, SyncServiceError> {
        self.graph.followers(actor_id).await
    }

    pub async fn following(&self, actor_id: &str) -> Result<Vec<String>, SyncServiceError> {
        self.graph.following(actor_id).await
    }

    pub async fn recommendations(
        &self,
        actor_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Recommendation>, SyncServiceError> {
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);
        self.graph.content_recommendations(actor_id, limit).await
    }

    pub async fn suggested_actors(
        &self,
        actor_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ActorSuggestion>, SyncServiceError> {
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);
        self.graph.actor_recommendations(actor_id, limit).await
    }
}
