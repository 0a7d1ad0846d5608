use crate::errors::ServiceError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

/// Header carrying the owning account, set by the upstream gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The account every query in the request is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserScope(pub Uuid);

impl UserScope {
    pub fn user_id(&self) -> Uuid {
        self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserScope
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ServiceError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))?;

        raw.to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(UserScope)
            .ok_or_else(|| ServiceError::Unauthorized(format!("Invalid {} header", USER_ID_HEADER)))
    }
}
