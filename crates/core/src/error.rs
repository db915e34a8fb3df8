use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("{0}")]
    AlreadyExists(String),

    #[error("No slots available for fitness class {class_id}")]
    CapacityExhausted { class_id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
