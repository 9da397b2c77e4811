use crate::domain::repository::OutboxStore;
use crate::domain::types::{MAX_RELAY_ATTEMPTS, OutboxRecord};
use crate::error::SyncServiceError;

pub const DEFAULT_LIST_LIMIT: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutboxStatusFilter {
    Pending,
    Quarantined,
    #[default]
    Recent,
}

impl OutboxStatusFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "quarantined" => Some(Self::Quarantined),
            "recent" => Some(Self::Recent),
            _ => None,
        }
    }
}

/// Operator visibility into the outbox: what is waiting, what gave up, what
/// happened lately.
pub struct ListOutboxRecordsUseCase<O: OutboxStore> {
    pub outbox: O,
}

impl<O: OutboxStore> ListOutboxRecordsUseCase<O> {
    pub async fn execute(
        &self,
        filter: OutboxStatusFilter,
        limit: Option<u64>,
    ) -> Result<Vec<OutboxRecord>, SyncServiceError> {
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIST_LIMIT);
        match filter {
            OutboxStatusFilter::Pending => {
                // The relay's pending query is unbounded; cap the listing here
                // so every filter honors the same limit.
                let mut records = self.outbox.find_pending(MAX_RELAY_ATTEMPTS).await?;
                records.truncate(limit as usize);
                Ok(records)
            }
            OutboxStatusFilter::Quarantined => self.outbox.list_quarantined(limit).await,
            OutboxStatusFilter::Recent => self.outbox.list_recent(limit).await,
        }
    }
}
