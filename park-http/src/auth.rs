use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the opaque operator identity issued by the auth layer
/// in front of this service
pub const OPERATOR_HEADER: &str = "x-operator-id";

/// Opaque operator identity attached to a request.
///
/// The core consumes this only to stamp `closed_by` on a closing
/// session; credential validation happens upstream. Absent or blank
/// means the close is recorded as anonymous.
#[derive(Debug, Clone)]
pub struct Identity(pub Option<String>);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let operator = parts
            .headers
            .get(OPERATOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(Identity(operator))
    }
}
