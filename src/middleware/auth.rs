use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Account identity of the caller, installed by the upstream auth layer
/// and forwarded as the X-Account-Id header. Finalization routes never use
/// this; the owning account is always read from the transaction row.
#[derive(Debug, Clone, Copy)]
pub struct AccountContext(pub Uuid);

pub async fn account_auth(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let account_id = req
        .headers()
        .get("X-Account-Id")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok());

    match account_id {
        Some(id) => {
            req.extensions_mut().insert(AccountContext(id));
            Ok(next.run(req).await)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}

pub async fn admin_auth(req: Request, next: Next) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let admin_api_key = std::env::var("ADMIN_API_KEY").unwrap_or_else(|_| "admin-secret-key".to_string());

    match auth_header {
        Some(auth) if auth == format!("Bearer {}", admin_api_key) || auth == admin_api_key => {
            Ok(next.run(req).await)
        }
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
