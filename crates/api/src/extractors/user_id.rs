use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use maleta_shared::AppError;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the caller's identity.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Identity of the back-office user making the request.
///
/// Authentication happens upstream; this service only trusts the header set
/// by the gateway in front of it. Used as `created_by` on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {USER_ID_HEADER} header")))?;

        let user_id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::Unauthorized(format!("Malformed {USER_ID_HEADER} header")))?;

        tracing::Span::current().record("user_id", tracing::field::display(user_id));
        Ok(Self(user_id))
    }
}
