pub mod health;
pub mod models;
pub mod profiles;

use axum::http::HeaderMap;

/// Header carrying the caller's user id. Authentication itself is out of
/// scope; ownership filtering just needs a stable caller identity.
pub const USER_ID_HEADER: &str = "x-user-id";

pub(crate) fn caller_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
