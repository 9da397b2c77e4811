use crate::domain::types::DEFAULT_RELAY_INTERVAL_SECS;

/// Sync service configuration loaded from environment variables.
#[derive(Debug)]
pub struct SyncConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// Neo4j bolt URI (e.g. "bolt://neo4j:7687").
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    /// TCP port to listen on (default 3120). Env var: `SYNC_PORT`.
    pub sync_port: u16,
    /// Seconds between outbox relay cycles (default 10). Env var: `RELAY_INTERVAL_SECS`.
    pub relay_interval_secs: u64,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            neo4j_uri: std::env::var("NEO4J_URI").expect("NEO4J_URI"),
            neo4j_user: std::env::var("NEO4J_USER").expect("NEO4J_USER"),
            neo4j_password: std::env::var("NEO4J_PASSWORD").expect("NEO4J_PASSWORD"),
            sync_port: std::env::var("SYNC_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3120),
            relay_interval_secs: std::env::var("RELAY_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RELAY_INTERVAL_SECS),
        }
    }
}
