pub mod contents;
pub mod outbox_records;
pub mod users;
