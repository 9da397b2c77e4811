use axum::http::StatusCode;

/// `GET /healthz` — process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz` — ready to take traffic. Services with hard backend
/// dependencies can mount their own probe instead.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
