//! Shared response envelope types for API handlers.
//!
//! Listings and reads use a `{ "data": ... }` envelope; writes answer with
//! an `{ "id": ..., "message": ... }` acknowledgement.

use fitstudio_core::types::DbId;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Acknowledgement of a create, update or delete.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub id: DbId,
    pub message: String,
}

impl ActionResponse {
    pub fn new(id: DbId, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }
}
