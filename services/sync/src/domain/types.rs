use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Attempts the relay makes before a record is quarantined.
pub const MAX_RELAY_ATTEMPTS: i32 = 3;

/// Upper bound on the stored `last_error` message.
pub const LAST_ERROR_MAX_LEN: usize = 255;

/// Default seconds between relay poll cycles.
pub const DEFAULT_RELAY_INTERVAL_SECS: u64 = 10;

/// Closed set of synchronization event kinds the relay knows how to dispatch.
/// Unknown kinds survive on the record as raw strings and are quarantined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    UserRegistered,
    ContentCreated,
    ContentDeleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRegistered => "USER_REGISTERED",
            Self::ContentCreated => "CONTENT_CREATED",
            Self::ContentDeleted => "CONTENT_DELETED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "USER_REGISTERED" => Some(Self::UserRegistered),
            "CONTENT_CREATED" => Some(Self::ContentCreated),
            "CONTENT_DELETED" => Some(Self::ContentDeleted),
            _ => None,
        }
    }
}

/// Unit of deferred cross-store work. Created by a producer, mutated only by
/// the relay afterwards; never deleted (append-only audit log).
#[derive(Debug, Clone)]
pub struct OutboxRecord {
    pub id: Uuid,
    pub kind: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub processed: bool,
    pub retry_count: i32,
    pub processed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl OutboxRecord {
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: kind.as_str().to_owned(),
            payload,
            created_at: Utc::now(),
            processed: false,
            retry_count: 0,
            processed_at: None,
            last_error: None,
        }
    }

    /// Picked up by the relay iff not processed and retries remain.
    pub fn is_pending(&self) -> bool {
        !self.processed && self.retry_count < MAX_RELAY_ATTEMPTS
    }

    /// Terminal failure: distinguished from success only by a non-null error.
    pub fn is_quarantined(&self) -> bool {
        self.processed && self.last_error.is_some()
    }

    pub fn mark_succeeded(&mut self) {
        self.processed = true;
        self.processed_at = Some(Utc::now());
        self.last_error = None;
    }

    /// Terminal, non-retryable outcome. `retry_count` stays untouched: waiting
    /// cannot make an unknown kind known or an invalid payload valid.
    pub fn mark_quarantined(&mut self, error: &str) {
        self.processed = true;
        self.processed_at = Some(Utc::now());
        self.last_error = Some(truncate_error(error));
    }

    /// Retryable failure. Quarantines once the attempt budget is exhausted.
    pub fn record_failure(&mut self, error: &str) {
        self.retry_count += 1;
        self.last_error = Some(truncate_error(error));
        if self.retry_count >= MAX_RELAY_ATTEMPTS {
            self.processed = true;
            self.processed_at = Some(Utc::now());
        }
    }
}

fn truncate_error(error: &str) -> String {
    if error.len() <= LAST_ERROR_MAX_LEN {
        return error.to_owned();
    }
    let mut end = LAST_ERROR_MAX_LEN;
    while !error.is_char_boundary(end) {
        end -= 1;
    }
    error[..end].to_owned()
}

/// Platform role a user holds; projected onto the graph actor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActorKind {
    #[default]
    Viewer,
    Creator,
    Admin,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "VIEWER",
            Self::Creator => "CREATOR",
            Self::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "VIEWER" => Some(Self::Viewer),
            "CREATOR" => Some(Self::Creator),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn from_i16(value: i16) -> Self {
        match value {
            1 => Self::Creator,
            2 => Self::Admin,
            _ => Self::Viewer,
        }
    }

    pub fn as_i16(&self) -> i16 {
        match self {
            Self::Viewer => 0,
            Self::Creator => 1,
            Self::Admin => 2,
        }
    }
}

/// Document-store user (source of truth).
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: ActorKind,
    pub created_at: DateTime<Utc>,
}

/// Document-store content (source of truth).
#[derive(Debug, Clone)]
pub struct Content {
    pub id: Uuid,
    pub title: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One entry from the "liked by actors you follow" graph traversal.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub content_id: String,
    pub title: Option<String>,
    pub popularity: i64,
}

/// One entry from the "followed by actors you follow" traversal.
#[derive(Debug, Clone)]
pub struct ActorSuggestion {
    pub actor_id: String,
    pub display_name: Option<String>,
    /// How many followed actors follow this one.
    pub mutuals: i64,
}
