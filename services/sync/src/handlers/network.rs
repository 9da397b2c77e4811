use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::error::SyncServiceError;
use crate::state::AppState;
use crate::usecase::network::NetworkQueries;

#[derive(Serialize)]
pub struct ActorListResponse {
    pub actor_ids: Vec<String>,
}

pub async fn followers(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ActorListResponse>, SyncServiceError> {
    let queries = NetworkQueries {
        graph: state.graph_store(),
    };
    let actor_ids = queries.followers(&user_id).await?;
    Ok(Json(ActorListResponse { actor_ids }))
}

pub async fn following(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ActorListResponse>, SyncServiceError> {
    let queries = NetworkQueries {
        graph: state.graph_store(),
    };
    let actor_ids = queries.following(&user_id).await?;
    Ok(Json(ActorListResponse { actor_ids }))
}

#[derive(Deserialize)]
pub struct RecommendationsQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct RecommendationDto {
    pub content_id: String,
    pub title: Option<String>,
    pub popularity: i64,
}

pub async fn recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<RecommendationsQuery>,
) -> Result<Json<Vec<RecommendationDto>>, SyncServiceError> {
    let queries = NetworkQueries {
        graph: state.graph_store(),
    };
    let items = queries.recommendations(&user_id, params.limit).await?;
    Ok(Json(
        items
            .into_iter()
            .map(|r| RecommendationDto {
                content_id: r.content_id,
                title: r.title,
                popularity: r.popularity,
            })
            .collect(),
    ))
}

#[derive(Serialize)]
pub struct ActorSuggestionDto {
    pub actor_id: String,
    pub display_name: Option<String>,
    pub mutuals: i64,
}

pub async fn suggested_actors(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<RecommendationsQuery>,
) -> Result<Json<Vec<ActorSuggestionDto>>, SyncServiceError> {
    let queries = NetworkQueries {
        graph: state.graph_store(),
    };
    let items = queries.suggested_actors(&user_id, params.limit).await?;
    Ok(Json(
        items
            .into_iter()
            .map(|s| ActorSuggestionDto {
                actor_id: s.actor_id,
                display_name: s.display_name,
                mutuals: s.mutuals,
            })
            .collect(),
    ))
}
