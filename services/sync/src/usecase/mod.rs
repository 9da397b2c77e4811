pub mod content;
pub mod interaction;
pub mod network;
pub mod outbox_admin;
pub mod projector;
pub mod register_user;
pub mod relay;
