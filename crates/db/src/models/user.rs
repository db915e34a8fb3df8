//! User entity model and DTOs.

use fitstudio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::query::Entity;

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub created_at: Timestamp,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["id", "name", "email", "created_at"];
}

/// Qualified `users` columns for predicates and ordering.
pub mod cols {
    pub const ID: &str = "users.id";
    pub const NAME: &str = "users.name";
    pub const EMAIL: &str = "users.email";
    pub const CREATED_AT: &str = "users.created_at";
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
}
