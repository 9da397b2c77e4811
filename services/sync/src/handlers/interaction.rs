use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::error::SyncServiceError;
use crate::state::AppState;
use crate::usecase::interaction::{EngagementQueries, ToggleFollowUseCase, ToggleLikeUseCase};

#[derive(Serialize)]
pub struct ToggleResponse {
    pub added: bool,
    pub count: i64,
}

pub async fn toggle_like(
    State(state): State<AppState>,
    Path((content_id, user_id)): Path<(String, String)>,
) -> Result<Json<ToggleResponse>, SyncServiceError> {
    let usecase = ToggleLikeUseCase {
        engagement: state.engagement_store(),
        graph: state.graph_store(),
    };
    let outcome = usecase.execute(&user_id, &content_id).await?;
    Ok(Json(ToggleResponse {
        added: outcome.added,
        count: outcome.count,
    }))
}

pub async fn toggle_follow(
    State(state): State<AppState>,
    Path((creator_id, follower_id)): Path<(String, String)>,
) -> Result<Json<ToggleResponse>, SyncServiceError> {
    let usecase = ToggleFollowUseCase {
        engagement: state.engagement_store(),
        graph: state.graph_store(),
    };
    let outcome = usecase.execute(&follower_id, &creator_id).await?;
    Ok(Json(ToggleResponse {
        added: outcome.added,
        count: outcome.count,
    }))
}

#[derive(Deserialize)]
pub struct LikeStatsQuery {
    /// When present, the response also says whether this user liked it.
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct LikeStatsResponse {
    pub count: i64,
    pub ranking_score: Option<f64>,
    pub ranking_position: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
}

pub async fn like_stats(
    State(state): State<AppState>,
    Path(content_id): Path<String>,
    Query(params): Query<LikeStatsQuery>,
) -> Result<Json<LikeStatsResponse>, SyncServiceError> {
    let queries = EngagementQueries {
        engagement: state.engagement_store(),
    };
    let stats = queries.like_stats(&content_id).await?;
    let liked = match params.user_id {
        Some(user_id) => Some(queries.has_liked(&user_id, &content_id).await?),
        None => None,
    };
    Ok(Json(LikeStatsResponse {
        count: stats.count,
        ranking_score: stats.ranking_score,
        ranking_position: stats.ranking_position,
        liked,
    }))
}

#[derive(Serialize)]
pub struct LikedContentsResponse {
    pub content_ids: Vec<String>,
}

pub async fn liked_contents(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<LikedContentsResponse>, SyncServiceError> {
    let queries = EngagementQueries {
        engagement: state.engagement_store(),
    };
    let content_ids = queries.liked_contents(&user_id).await?;
    Ok(Json(LikedContentsResponse { content_ids }))
}
