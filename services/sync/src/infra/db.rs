use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use atelier_sync_schema::{contents, outbox_records, users};

use crate::domain::repository::{ContentRepository, OutboxStore, UserRepository};
use crate::domain::types::{ActorKind, Content, OutboxRecord, User};
use crate::error::SyncServiceError;

// ── Outbox store ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxStore {
    pub db: DatabaseConnection,
}

impl OutboxStore for DbOutboxStore {
    async fn append(&self, record: &OutboxRecord) -> Result<Uuid, SyncServiceError> {
        outbox_records::ActiveModel {
            id: Set(record.id),
            kind: Set(record.kind.clone()),
            payload: Set(record.payload.clone()),
            retry_count: Set(record.retry_count),
            processed: Set(record.processed),
            last_error: Set(record.last_error.clone()),
            created_at: Set(record.created_at),
            processed_at: Set(record.processed_at),
        }
        .insert(&self.db)
        .await
        .context("append outbox record")
        .map_err(SyncServiceError::Storage)?;
        Ok(record.id)
    }

    async fn find_pending(
        &self,
        max_attempts: i32,
    ) -> Result<Vec<OutboxRecord>, SyncServiceError> {
        let models = outbox_records::Entity::find()
            .filter(outbox_records::Column::Processed.eq(false))
            .filter(outbox_records::Column::RetryCount.lt(max_attempts))
            .order_by_asc(outbox_records::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("find pending outbox records")
            .map_err(SyncServiceError::Storage)?;
        Ok(models.into_iter().map(record_from_model).collect())
    }

    async fn save(&self, record: &OutboxRecord) -> Result<(), SyncServiceError> {
        outbox_records::ActiveModel {
            id: Set(record.id),
            retry_count: Set(record.retry_count),
            processed: Set(record.processed),
            last_error: Set(record.last_error.clone()),
            processed_at: Set(record.processed_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("save outbox record")
        .map_err(SyncServiceError::Storage)?;
        Ok(())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<OutboxRecord>, SyncServiceError> {
        let models = outbox_records::Entity::find()
            .order_by_desc(outbox_records::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent outbox records")
            .map_err(SyncServiceError::Storage)?;
        Ok(models.into_iter().map(record_from_model).collect())
    }

    async fn list_quarantined(&self, limit: u64) -> Result<Vec<OutboxRecord>, SyncServiceError> {
        let models = outbox_records::Entity::find()
            .filter(outbox_records::Column::Processed.eq(true))
            .filter(outbox_records::Column::LastError.is_not_null())
            .order_by_desc(outbox_records::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list quarantined outbox records")
            .map_err(SyncServiceError::Storage)?;
        Ok(models.into_iter().map(record_from_model).collect())
    }
}

fn record_from_model(model: outbox_records::Model) -> OutboxRecord {
    OutboxRecord {
        id: model.id,
        kind: model.kind,
        payload: model.payload,
        retry_count: model.retry_count,
        processed: model.processed,
        last_error: model.last_error,
        created_at: model.created_at,
        processed_at: model.processed_at,
    }
}

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn create(&self, user: &User) -> Result<(), SyncServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            display_name: Set(user.display_name.clone()),
            email: Set(user.email.clone()),
            role: Set(user.role.as_i16()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .context("create user")
        .map_err(SyncServiceError::Storage)?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SyncServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")
            .map_err(SyncServiceError::Storage)?;
        Ok(model.map(user_from_model))
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        display_name: model.display_name,
        email: model.email,
        role: ActorKind::from_i16(model.role),
        created_at: model.created_at,
    }
}

// ── Content repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbContentRepository {
    pub db: DatabaseConnection,
}

impl ContentRepository for DbContentRepository {
    async fn create(&self, content: &Content) -> Result<(), SyncServiceError> {
        contents::ActiveModel {
            id: Set(content.id),
            title: Set(content.title.clone()),
            creator_id: Set(content.creator_id),
            created_at: Set(content.created_at),
        }
        .insert(&self.db)
        .await
        .context("create content")
        .map_err(SyncServiceError::Storage)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SyncServiceError> {
        let result = contents::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete content")
            .map_err(SyncServiceError::Storage)?;
        Ok(result.rows_affected > 0)
    }
}
