use deadpool_redis::Pool as RedisPool;
use neo4rs::Graph;
use sea_orm::DatabaseConnection;

use crate::infra::cache::RedisEngagementStore;
use crate::infra::db::{DbContentRepository, DbOutboxStore, DbUserRepository};
use crate::infra::graph::Neo4jGraphStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub graph: Graph,
}

impl AppState {
    pub fn outbox_store(&self) -> DbOutboxStore {
        DbOutboxStore {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn content_repo(&self) -> DbContentRepository {
        DbContentRepository {
            db: self.db.clone(),
        }
    }

    pub fn graph_store(&self) -> Neo4jGraphStore {
        Neo4jGraphStore {
            graph: self.graph.clone(),
        }
    }

    pub fn engagement_store(&self) -> RedisEngagementStore {
        RedisEngagementStore {
            pool: self.redis.clone(),
        }
    }
}
