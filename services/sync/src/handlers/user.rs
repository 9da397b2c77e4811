use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::ActorKind;
use crate::error::SyncServiceError;
use crate::state::AppState;
use crate::usecase::register_user::{RegisterUserInput, RegisterUserUseCase};

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterUserResponse {
    pub id: Uuid,
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), SyncServiceError> {
    let role = match body.role.as_deref() {
        Some(raw) => ActorKind::parse(raw)
            .ok_or_else(|| SyncServiceError::InvalidPayload(format!("unknown role: {raw}")))?,
        None => ActorKind::default(),
    };
    let usecase = RegisterUserUseCase {
        users: state.user_repo(),
        outbox: state.outbox_store(),
    };
    let user = usecase
        .execute(RegisterUserInput {
            display_name: body.display_name,
            email: body.email,
            role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(RegisterUserResponse { id: user.id })))
}
