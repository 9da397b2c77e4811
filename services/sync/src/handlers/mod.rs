pub mod content;
pub mod interaction;
pub mod network;
pub mod outbox;
pub mod user;
