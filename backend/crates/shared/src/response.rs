//! Success envelope
//!
//! Every successful JSON body carries `"success": true` next to its payload
//! fields, e.g. `{ "success": true, "course": { ... } }`.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    payload: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            payload,
        }
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for Envelope<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}
