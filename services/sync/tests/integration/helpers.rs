use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use atelier_sync::domain::repository::{
    ContentRepository, GraphStore, OutboxStore, UserRepository,
};
use atelier_sync::domain::types::{Content, OutboxRecord, User};
use atelier_sync::error::SyncServiceError;

// ── InMemoryOutbox ────────────────────────────────────────────────────────────

/// Clonable so producers and the relay share one record list, like they share
/// one table in production.
#[derive(Clone, Default)]
pub struct InMemoryOutbox {
    pub records: Arc<Mutex<Vec<OutboxRecord>>>,
}

impl InMemoryOutbox {
    pub fn record(&self, id: Uuid) -> OutboxRecord {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .unwrap()
    }
}

impl OutboxStore for InMemoryOutbox {
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
        let mut records = self.records.lock().unwrap();
        let slot = records.iter_mut().find(|r| r.id == record.id).unwrap();
        *slot = record.clone();
        Ok(())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<OutboxRecord>, SyncServiceError> {
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit as usize);
        Ok(records)
    }

    async fn list_quarantined(&self, limit: u64) -> Result<Vec<OutboxRecord>, SyncServiceError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_quarantined())
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

// ── InMemoryGraph ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryGraph {
    pub actors: Arc<Mutex<HashMap<String, String>>>,
    pub contents: Arc<Mutex<HashMap<String, String>>>,
    pub like_edges: Arc<Mutex<HashSet<(String, String)>>>,
    pub follow_edges: Arc<Mutex<HashSet<(String, String)>>>,
    outage: Arc<AtomicBool>,
}

impl InMemoryGraph {
    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    fn check_up(&self) -> Result<(), SyncServiceError> {
        if self.outage.load(Ordering::SeqCst) {
            Err(SyncServiceError::storage(anyhow::anyhow!(
                "graph unavailable"
            )))
        } else {
            Ok(())
        }
    }
}

impl GraphStore for InMemoryGraph {
    async fn upsert_actor(
        &self,
        actor_id: &str,
        display_name: &str,
        _kind: &str,
    ) -> Result<u64, SyncServiceError> {
        self.check_up()?;
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
        self.check_up()?;
        self.contents
            .lock()
            .unwrap()
            .insert(content_id.to_owned(), title.to_owned());
        Ok(1)
    }

    async fn delete_content(&self, content_id: &str) -> Result<(), SyncServiceError> {
        self.check_up()?;
        self.contents.lock().unwrap().remove(content_id);
        self.like_edges
            .lock()
            .unwrap()
            .retain(|(_, c)| c != content_id);
        Ok(())
    }

    async fn merge_like_edge(
        &self,
        actor_id: &str,
        content_id: &str,
    ) -> Result<(), SyncServiceError> {
        self.check_up()?;
        self.like_edges
            .lock()
            .unwrap()
            .insert((actor_id.to_owned(), content_id.to_owned()));
        Ok(())
    }

    async fn delete_like_edge(
        &self,
        actor_id: &str,
        content_id: &str,
    ) -> Result<(), SyncServiceError> {
        self.check_up()?;
        self.like_edges
            .lock()
            .unwrap()
            .remove(&(actor_id.to_owned(), content_id.to_owned()));
        Ok(())
    }

    async fn merge_follow_edge(
        &self,
        follower_id: &str,
        creator_id: &str,
    ) -> Result<(), SyncServiceError> {
        self.check_up()?;
        self.follow_edges
            .lock()
            .unwrap()
            .insert((follower_id.to_owned(), creator_id.to_owned()));
        Ok(())
    }

    async fn delete_follow_edge(
        &self,
        follower_id: &str,
        creator_id: &str,
    ) -> Result<(), SyncServiceError> {
        self.check_up()?;
        self.follow_edges
            .lock()
            .unwrap()
            .remove(&(follower_id.to_owned(), creator_id.to_owned()));
        Ok(())
    }
}

// ── InMemoryUsers / InMemoryContents ─────────────────────────────────────────

#[derive(Clone, Default)]
pub struct InMemoryUsers {
    pub rows: Arc<Mutex<Vec<User>>>,
}

impl UserRepository for InMemoryUsers {
    async fn create(&self, user: &User) -> Result<(), SyncServiceError> {
        self.rows.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SyncServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryContents {
    pub rows: Arc<Mutex<Vec<Content>>>,
}

impl ContentRepository for InMemoryContents {
    async fn create(&self, content: &Content) -> Result<(), SyncServiceError> {
        self.rows.lock().unwrap().push(content.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, SyncServiceError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() < before)
    }
}
