use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use atelier_core::health::{healthz, readyz};
use atelier_core::middleware::request_id_layer;

use crate::handlers::{
    content::{create_content, delete_content},
    interaction::{like_stats, liked_contents, toggle_follow, toggle_like},
    network::{followers, following, recommendations, suggested_actors},
    outbox::list_outbox,
    user::register_user,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Producers
        .route("/users", post(register_user))
        .route("/contents", post(create_content))
        .route("/contents/{id}", delete(delete_content))
        // Inline engagement gateway
        .route("/contents/{content_id}/likes/{user_id}", put(toggle_like))
        .route("/contents/{content_id}/likes", get(like_stats))
        .route("/users/{user_id}/likes", get(liked_contents))
        .route(
            "/users/{creator_id}/followers/{follower_id}",
            put(toggle_follow),
        )
        // Graph reads
        .route("/users/{user_id}/followers", get(followers))
        .route("/users/{user_id}/following", get(following))
        .route("/users/{user_id}/recommendations", get(recommendations))
        .route("/users/{user_id}/suggestions", get(suggested_actors))
        // Operational surface
        .route("/admin/outbox", get(list_outbox))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
