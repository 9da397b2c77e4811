use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{ContentRepository, OutboxStore};
use crate::domain::types::{Content, EventKind, OutboxRecord};
use crate::error::SyncServiceError;

pub struct CreateContentInput {
    pub title: String,
    pub creator_id: Uuid,
}

/// Creates a content row, then appends a `CONTENT_CREATED` record.
/// Same dual-write discipline as user registration: the append is
/// best-effort and never fails the request.
pub struct CreateContentUseCase<C: ContentRepository, O: OutboxStore> {
    pub contents: C,
    pub outbox: O,
}

impl<C: ContentRepository, O: OutboxStore> CreateContentUseCase<C, O> {
    pub async fn execute(&self, input: CreateContentInput) -> Result<Content, SyncServiceError> {
        if input.title.trim().is_empty() {
            return Err(SyncServiceError::InvalidPayload("title is blank".into()));
        }

        let content = Content {
            id: Uuid::now_v7(),
            title: input.title,
            creator_id: input.creator_id,
            created_at: Utc::now(),
        };
        self.contents.create(&content).await?;

        let record = OutboxRecord::new(
            EventKind::ContentCreated,
            json!({
                "contentId": content.id,
                "title": content.title,
            }),
        );
        if let Err(err) = self.outbox.append(&record).await {
            tracing::error!(
                content_id = %content.id,
                error = %err,
                "primary write committed but outbox append failed; manual reconciliation required"
            );
        }
        Ok(content)
    }
}

/// Deletes a content row, then appends a `CONTENT_DELETED` record so the
/// relay removes the graph node and its edges.
pub struct DeleteContentUseCase<C: ContentRepository, O: OutboxStore> {
    pub contents: C,
    pub outbox: O,
}

impl<C: ContentRepository, O: OutboxStore> DeleteContentUseCase<C, O> {
    pub async fn execute(&self, content_id: Uuid) -> Result<(), SyncServiceError> {
        let deleted = self.contents.delete(content_id).await?;
        if !deleted {
            return Err(SyncServiceError::ContentNotFound);
        }

        let record = OutboxRecord::new(
            EventKind::ContentDeleted,
            json!({ "contentId": content_id }),
        );
        if let Err(err) = self.outbox.append(&record).await {
            tracing::error!(
                content_id = %content_id,
                error = %err,
                "primary write committed but outbox append failed; manual reconciliation required"
            );
        }
        Ok(())
    }
}
