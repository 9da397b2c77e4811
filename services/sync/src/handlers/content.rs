use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SyncServiceError;
use crate::state::AppState;
use crate::usecase::content::{CreateContentInput, CreateContentUseCase, DeleteContentUseCase};

#[derive(Deserialize)]
pub struct CreateContentRequest {
    pub title: String,
    pub creator_id: Uuid,
}

#[derive(Serialize)]
pub struct CreateContentResponse {
    pub id: Uuid,
}

pub async fn create_content(
    State(state): State<AppState>,
    Json(body): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<CreateContentResponse>), SyncServiceError> {
    let usecase = CreateContentUseCase {
        contents: state.content_repo(),
        outbox: state.outbox_store(),
    };
    let content = usecase
        .execute(CreateContentInput {
            title: body.title,
            creator_id: body.creator_id,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateContentResponse { id: content.id }),
    ))
}

pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SyncServiceError> {
    let usecase = DeleteContentUseCase {
        contents: state.content_repo(),
        outbox: state.outbox_store(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
