use crate::domain::repository::GraphStore;
use crate::error::SyncServiceError;

/// Idempotent translation of document-store changes into graph-store nodes.
///
/// Upserts are match-or-create keyed on the document-store (foreign) id, so
/// replaying the same event produces exactly one node. The underlying store
/// reports the affected-node count; zero means it silently did nothing, which
/// is surfaced as `ProjectionFailed` instead of being swallowed.
pub struct GraphProjector<G: GraphStore> {
    pub graph: G,
}

impl<G: GraphStore> GraphProjector<G> {
    pub async fn upsert_actor(
        &self,
        actor_id: &str,
        display_name: &str,
        kind: &str,
    ) -> Result<(), SyncServiceError> {
        if actor_id.trim().is_empty() {
            return Err(SyncServiceError::InvalidPayload(
                "actor foreign id is blank".into(),
            ));
        }
        let affected = self.graph.upsert_actor(actor_id, display_name, kind).await?;
        if affected == 0 {
            return Err(SyncServiceError::ProjectionFailed(format!(
                "graph store affected no actor node for {actor_id}"
            )));
        }
        tracing::debug!(actor_id, "actor node upserted");
        Ok(())
    }

    pub async fn upsert_content(
        &self,
        content_id: &str,
        title: &str,
    ) -> Result<(), SyncServiceError> {
        if content_id.trim().is_empty() {
            return Err(SyncServiceError::InvalidPayload(
                "content foreign id is blank".into(),
            ));
        }
        let affected = self.graph.upsert_content(content_id, title).await?;
        if affected == 0 {
            return Err(SyncServiceError::ProjectionFailed(format!(
                "graph store affected no content node for {content_id}"
            )));
        }
        tracing::debug!(content_id, "content node upserted");
        Ok(())
    }

    /// Match-and-delete: an already-absent node is success.
    pub async fn delete_content(&self, content_id: &str) -> Result<(), SyncServiceError> {
        if content_id.trim().is_empty() {
            return Err(SyncServiceError::InvalidPayload(
                "content foreign id is blank".into(),
            ));
        }
        self.graph.delete_content(content_id).await?;
        tracing::debug!(content_id, "content node deleted (or was absent)");
        Ok(())
    }
}
