//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row,
//!   with its [`Entity`](crate::query::Entity) declaration
//! - Qualified column names for building predicates
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches

pub mod booking;
pub mod fitness_class;
pub mod user;
