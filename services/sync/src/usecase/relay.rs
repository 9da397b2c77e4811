use serde_json::Value;

use crate::domain::repository::{GraphStore, OutboxStore};
use crate::domain::types::{EventKind, MAX_RELAY_ATTEMPTS, OutboxRecord};
use crate::error::SyncServiceError;
use crate::usecase::projector::GraphProjector;

/// Outcome counters for one poll cycle, logged by the worker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    pub succeeded: u64,
    pub retried: u64,
    pub quarantined: u64,
}

impl CycleStats {
    pub fn is_empty(&self) -> bool {
        self.succeeded == 0 && self.retried == 0 && self.quarantined == 0
    }
}

/// Drains pending outbox records into graph projections.
///
/// Per record, per cycle: success marks it processed; a retryable fault bumps
/// `retry_count` (quarantining once the budget is spent); a validation fault
/// or unknown kind quarantines immediately. A fault in one record never
/// aborts the rest of the cycle, and a failed state save is tolerated: the
/// unchanged stored record simply retries identically next cycle.
pub struct OutboxRelay<S: OutboxStore, G: GraphStore> {
    pub outbox: S,
    pub projector: GraphProjector<G>,
}

impl<S: OutboxStore, G: GraphStore> OutboxRelay<S, G> {
    pub async fn run_cycle(&self) -> Result<CycleStats, SyncServiceError> {
        let pending = self.outbox.find_pending(MAX_RELAY_ATTEMPTS).await?;
        if pending.is_empty() {
            return Ok(CycleStats::default());
        }
        tracing::info!(count = pending.len(), "processing pending outbox records");

        let mut stats = CycleStats::default();
        for mut record in pending {
            match self.dispatch(&record).await {
                Ok(()) => {
                    record.mark_succeeded();
                    stats.succeeded += 1;
                    tracing::info!(id = %record.id, kind = %record.kind, "outbox record processed");
                }
                Err(err) if err.is_retryable() => {
                    record.record_failure(&err.to_string());
                    if record.processed {
                        stats.quarantined += 1;
                        tracing::error!(
                            id = %record.id,
                            kind = %record.kind,
                            error = %err,
                            "outbox record exhausted retries, quarantined"
                        );
                    } else {
                        stats.retried += 1;
                        tracing::warn!(
                            id = %record.id,
                            kind = %record.kind,
                            retry = record.retry_count,
                            max = MAX_RELAY_ATTEMPTS,
                            error = %err,
                            "outbox record failed, will retry"
                        );
                    }
                }
                Err(err) => {
                    record.mark_quarantined(&err.to_string());
                    stats.quarantined += 1;
                    tracing::error!(
                        id = %record.id,
                        kind = %record.kind,
                        error = %err,
                        "outbox record quarantined (non-retryable fault)"
                    );
                }
            }

            if let Err(save_err) = self.outbox.save(&record).await {
                // The stored record is untouched; next cycle re-derives the
                // same attempt. At-least-once, absorbed by projector idempotency.
                tracing::error!(
                    id = %record.id,
                    error = %save_err,
                    "failed to persist outbox record state"
                );
            }
        }
        Ok(stats)
    }

    async fn dispatch(&self, record: &OutboxRecord) -> Result<(), SyncServiceError> {
        let kind = EventKind::parse(&record.kind)
            .ok_or_else(|| SyncServiceError::UnknownEventKind(record.kind.clone()))?;
        match kind {
            EventKind::UserRegistered => {
                let user_id = require_str(&record.payload, "userId", kind)?;
                let display_name = require_str(&record.payload, "displayName", kind)?;
                let actor_kind = optional_str(&record.payload, "actorKind").unwrap_or("VIEWER");
                self.projector
                    .upsert_actor(user_id, display_name, actor_kind)
                    .await
            }
            EventKind::ContentCreated => {
                let content_id = require_str(&record.payload, "contentId", kind)?;
                let title = optional_str(&record.payload, "title").unwrap_or("Untitled");
                self.projector.upsert_content(content_id, title).await
            }
            EventKind::ContentDeleted => {
                let content_id = require_str(&record.payload, "contentId", kind)?;
                self.projector.delete_content(content_id).await
            }
        }
    }
}

fn require_str<'a>(
    payload: &'a Value,
    key: &str,
    kind: EventKind,
) -> Result<&'a str, SyncServiceError> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            SyncServiceError::InvalidPayload(format!("missing {key} for {}", kind.as_str()))
        })
}

fn optional_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct MockOutbox {
        records: Mutex<Vec<OutboxRecord>>,
        fail_saves: bool,
    }

    impl MockOutbox {
        fn with(records: Vec<OutboxRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                fail_saves: false,
            }
        }

        fn get(&self, id: Uuid) -> OutboxRecord {
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .unwrap()
        }
    }

    impl OutboxStore for MockOutbox {
        async fn append(&self, record: &OutboxRecord) -> Result<Uuid, SyncServiceError> {
            self.records.lock().unwrap().push(record.clone());
            Ok(record.id)
        }

        async fn find_pending(
            &self,
            max_attempts: i32,
        ) -> Result<Vec<OutboxRecord>, SyncServiceError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| !r.processed && r.retry_count < max_attempts)
                .cloned()
                .collect())
        }

        async fn save(&self, record: &OutboxRecord) -> Result<(), SyncServiceError> {
            if self.fail_saves {
                return Err(SyncServiceError::storage(anyhow::anyhow!(
                    "record store unreachable"
                )));
            }
            let mut records = self.records.lock().unwrap();
            let slot = records.iter_mut().find(|r| r.id == record.id).unwrap();
            *slot = record.clone();
            Ok(())
        }

        async fn list_recent(&self, _limit: u64) -> Result<Vec<OutboxRecord>, SyncServiceError> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn list_quarantined(
            &self,
            _limit: u64,
        ) -> Result<Vec<OutboxRecord>, SyncServiceError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.is_quarantined())
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct FakeGraph {
        actors: Mutex<HashMap<String, String>>,
        contents: Mutex<HashMap<String, String>>,
        always_fail: bool,
    }

    impl GraphStore for FakeGraph {
        async fn upsert_actor(
            &self,
            actor_id: &str,
            display_name: &str,
            _kind: &str,
        ) -> Result<u64, SyncServiceError> {
            if self.always_fail {
                return Err(SyncServiceError::storage(anyhow::anyhow!(
                    "graph unavailable"
                )));
            }
            self.actors
                .lock()
                .unwrap()
                .insert(actor_id.to_owned(), display_name.to_owned());
            Ok(1)
        }

        async fn upsert_content(
            &self,
            content_id: &str,
            title: &str,
        ) -> Result<u64, SyncServiceError> {
            if self.always_fail {
                return Err(SyncServiceError::storage(anyhow::anyhow!(
                    "graph unavailable"
                )));
            }
            self.contents
                .lock()
                .unwrap()
                .insert(content_id.to_owned(), title.to_owned());
            Ok(1)
        }

        async fn delete_content(&self, content_id: &str) -> Result<(), SyncServiceError> {
            if self.always_fail {
                return Err(SyncServiceError::storage(anyhow::anyhow!(
                    "graph unavailable"
                )));
            }
            self.contents.lock().unwrap().remove(content_id);
            Ok(())
        }

        async fn merge_like_edge(&self, _: &str, _: &str) -> Result<(), SyncServiceError> {
            Ok(())
        }
        async fn delete_like_edge(&self, _: &str, _: &str) -> Result<(), SyncServiceError> {
            Ok(())
        }
        async fn merge_follow_edge(&self, _: &str, _: &str) -> Result<(), SyncServiceError> {
            Ok(())
        }
        async fn delete_follow_edge(&self, _: &str, _: &str) -> Result<(), SyncServiceError> {
            Ok(())
        }
    }

    fn relay(outbox: MockOutbox, graph: FakeGraph) -> OutboxRelay<MockOutbox, FakeGraph> {
        OutboxRelay {
            outbox,
            projector: GraphProjector { graph },
        }
    }

    #[tokio::test]
    async fn should_project_content_created_and_mark_processed() {
        let record = OutboxRecord::new(
            EventKind::ContentCreated,
            json!({"contentId": "c1", "title": "Ballet"}),
        );
        let id = record.id;
        let relay = relay(MockOutbox::with(vec![record]), FakeGraph::default());

        let stats = relay.run_cycle().await.unwrap();

        assert_eq!(stats.succeeded, 1);
        let contents = relay.projector.graph.contents.lock().unwrap();
        assert_eq!(contents.get("c1"), Some(&"Ballet".to_owned()));
        assert_eq!(contents.len(), 1);
        drop(contents);
        let saved = relay.outbox.get(id);
        assert!(saved.processed);
        assert!(saved.last_error.is_none());
        assert!(saved.processed_at.is_some());
    }

    #[tokio::test]
    async fn should_quarantine_unknown_kind_without_counting_a_retry() {
        let mut record = OutboxRecord::new(EventKind::ContentCreated, json!({}));
        record.kind = "BOGUS".to_owned();
        let id = record.id;
        let relay = relay(MockOutbox::with(vec![record]), FakeGraph::default());

        let stats = relay.run_cycle().await.unwrap();

        assert_eq!(stats.quarantined, 1);
        let saved = relay.outbox.get(id);
        assert!(saved.processed);
        assert_eq!(saved.retry_count, 0);
        assert!(saved.last_error.is_some());
    }

    #[tokio::test]
    async fn should_quarantine_missing_payload_key_immediately() {
        let record = OutboxRecord::new(EventKind::UserRegistered, json!({"userId": "u1"}));
        let id = record.id;
        let relay = relay(MockOutbox::with(vec![record]), FakeGraph::default());

        relay.run_cycle().await.unwrap();

        let saved = relay.outbox.get(id);
        assert!(saved.is_quarantined());
        assert_eq!(saved.retry_count, 0);
        assert!(saved.last_error.as_ref().unwrap().contains("displayName"));
    }

    #[tokio::test]
    async fn should_quarantine_after_exactly_max_attempts() {
        let record = OutboxRecord::new(
            EventKind::UserRegistered,
            json!({"userId": "u1", "displayName": "Ada"}),
        );
        let id = record.id;
        let relay = relay(
            MockOutbox::with(vec![record]),
            FakeGraph {
                always_fail: true,
                ..Default::default()
            },
        );

        for attempt in 1..=MAX_RELAY_ATTEMPTS {
            let stats = relay.run_cycle().await.unwrap();
            let saved = relay.outbox.get(id);
            assert_eq!(saved.retry_count, attempt);
            if attempt < MAX_RELAY_ATTEMPTS {
                assert_eq!(stats.retried, 1);
                assert!(!saved.processed, "attempt {attempt} must not be terminal");
            } else {
                assert_eq!(stats.quarantined, 1);
                assert!(saved.is_quarantined());
            }
        }

        // Exhausted records are invisible to further cycles.
        let stats = relay.run_cycle().await.unwrap();
        assert!(stats.is_empty());
        assert_eq!(relay.outbox.get(id).retry_count, MAX_RELAY_ATTEMPTS);
    }

    #[tokio::test]
    async fn should_process_remaining_records_when_one_faults() {
        let bad = OutboxRecord::new(EventKind::ContentCreated, json!({"title": "no id"}));
        let good = OutboxRecord::new(
            EventKind::ContentCreated,
            json!({"contentId": "c2", "title": "Mural"}),
        );
        let good_id = good.id;
        let relay = relay(MockOutbox::with(vec![bad, good]), FakeGraph::default());

        let stats = relay.run_cycle().await.unwrap();

        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.quarantined, 1);
        assert!(relay.outbox.get(good_id).processed);
        assert!(
            relay
                .projector
                .graph
                .contents
                .lock()
                .unwrap()
                .contains_key("c2")
        );
    }

    #[tokio::test]
    async fn should_retry_identically_when_save_fails() {
        let record = OutboxRecord::new(
            EventKind::ContentCreated,
            json!({"contentId": "c1", "title": "Ballet"}),
        );
        let id = record.id;
        let mut outbox = MockOutbox::with(vec![record]);
        outbox.fail_saves = true;
        let relay = relay(outbox, FakeGraph::default());

        let stats = relay.run_cycle().await.unwrap();
        assert_eq!(stats.succeeded, 1);

        // Outcome was lost, so the stored record is unchanged and the next
        // cycle re-processes it; the idempotent projector absorbs the replay.
        let saved = relay.outbox.get(id);
        assert!(!saved.processed);
        let stats = relay.run_cycle().await.unwrap();
        assert_eq!(stats.succeeded, 1);
        assert_eq!(relay.projector.graph.contents.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_apply_default_actor_kind_and_title() {
        let user = OutboxRecord::new(
            EventKind::UserRegistered,
            json!({"userId": "u1", "displayName": "Ada"}),
        );
        let content = OutboxRecord::new(EventKind::ContentCreated, json!({"contentId": "c1"}));
        let relay = relay(MockOutbox::with(vec![user, content]), FakeGraph::default());

        let stats = relay.run_cycle().await.unwrap();

        assert_eq!(stats.succeeded, 2);
        assert_eq!(
            relay.projector.graph.contents.lock().unwrap().get("c1"),
            Some(&"Untitled".to_owned())
        );
    }

    #[tokio::test]
    async fn should_delete_content_node() {
        let create = OutboxRecord::new(
            EventKind::ContentCreated,
            json!({"contentId": "c1", "title": "Ballet"}),
        );
        let delete = OutboxRecord::new(EventKind::ContentDeleted, json!({"contentId": "c1"}));
        let relay = relay(MockOutbox::with(vec![create, delete]), FakeGraph::default());

        relay.run_cycle().await.unwrap();

        assert!(relay.projector.graph.contents.lock().unwrap().is_empty());
    }
}
