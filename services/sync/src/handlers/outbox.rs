use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::OutboxRecord;
use crate::error::SyncServiceError;
use crate::state::AppState;
use crate::usecase::outbox_admin::{ListOutboxRecordsUseCase, OutboxStatusFilter};

#[derive(Deserialize)]
pub struct ListOutboxQuery {
    pub status: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct OutboxRecordDto {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub retry_count: i32,
    pub processed: bool,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<OutboxRecord> for OutboxRecordDto {
    fn from(record: OutboxRecord) -> Self {
        Self {
            id: record.id,
            kind: record.kind,
            payload: record.payload,
            retry_count: record.retry_count,
            processed: record.processed,
            last_error: record.last_error,
            created_at: record.created_at,
            processed_at: record.processed_at,
        }
    }
}

pub async fn list_outbox(
    State(state): State<AppState>,
    Query(params): Query<ListOutboxQuery>,
) -> Result<Json<Vec<OutboxRecordDto>>, SyncServiceError> {
    let filter = match params.status.as_deref() {
        Some(raw) => OutboxStatusFilter::parse(raw)
            .ok_or_else(|| SyncServiceError::InvalidPayload(format!("unknown status: {raw}")))?,
        None => OutboxStatusFilter::default(),
    };
    let usecase = ListOutboxRecordsUseCase {
        outbox: state.outbox_store(),
    };
    let records = usecase.execute(filter, params.limit).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}
