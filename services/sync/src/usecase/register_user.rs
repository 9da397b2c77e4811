use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{OutboxStore, UserRepository};
use crate::domain::types::{ActorKind, EventKind, OutboxRecord, User};
use crate::error::SyncServiceError;

pub struct RegisterUserInput {
    pub display_name: String,
    pub email: String,
    pub role: ActorKind,
}

/// Registers a user in the document store, then appends a `USER_REGISTERED`
/// outbox record for the relay to project into the graph.
///
/// The append is a separate write from the user insert. If it fails the user
/// is still registered; the gap is logged at error level and left to manual
/// reconciliation rather than failing the request or rolling back.
pub struct RegisterUserUseCase<R: UserRepository, O: OutboxStore> {
    pub users: R,
    pub outbox: O,
}

impl<R: UserRepository, O: OutboxStore> RegisterUserUseCase<R, O> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, SyncServiceError> {
        if input.display_name.trim().is_empty() {
            return Err(SyncServiceError::InvalidPayload(
                "display name is blank".into(),
            ));
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(SyncServiceError::EmailTaken);
        }

        let user = User {
            id: Uuid::now_v7(),
            display_name: input.display_name,
            email: input.email,
            role: input.role,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;

        let record = OutboxRecord::new(
            EventKind::UserRegistered,
            json!({
                "userId": user.id,
                "displayName": user.display_name,
                "actorKind": user.role.as_str(),
            }),
        );
        if let Err(err) = self.outbox.append(&record).await {
            tracing::error!(
                user_id = %user.id,
                error = %err,
                "primary write committed but outbox append failed; manual reconciliation required"
            );
        }
        Ok(user)
    }
}
