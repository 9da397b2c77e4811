use std::time::Duration;

use neo4rs::Graph;
use sea_orm::Database;
use tracing::info;

use atelier_core::tracing::init_tracing;
use atelier_sync::config::SyncConfig;
use atelier_sync::router::build_router;
use atelier_sync::state::AppState;
use atelier_sync::worker::spawn_outbox_relay;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = SyncConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let graph = Graph::new(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
        .await
        .expect("failed to connect to Neo4j");

    let state = AppState { db, redis, graph };

    spawn_outbox_relay(
        state.clone(),
        Duration::from_secs(config.relay_interval_secs),
    );

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.sync_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("sync service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
