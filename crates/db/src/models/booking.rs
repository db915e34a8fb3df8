//! Booking entity model and DTOs.

use fitstudio_core::types::{ClassDate, ClassTime, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::query::Entity;

/// A booking row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub user_id: DbId,
    pub class_id: DbId,
    /// Studio-local date the booking was made.
    pub booked_at: ClassDate,
    pub created_at: Timestamp,
}

impl Entity for Booking {
    const TABLE: &'static str = "bookings";
    const COLUMNS: &'static [&'static str] =
        &["id", "user_id", "class_id", "booked_at", "created_at"];
}

/// Qualified `bookings` columns for predicates and ordering.
pub mod cols {
    pub const ID: &str = "bookings.id";
    pub const USER_ID: &str = "bookings.user_id";
    pub const CLASS_ID: &str = "bookings.class_id";
    pub const BOOKED_AT: &str = "bookings.booked_at";
    pub const CREATED_AT: &str = "bookings.created_at";
}

/// A booking joined with its user and class.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingDetail {
    pub id: DbId,
    pub booked_at: ClassDate,
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub class_id: DbId,
    pub class_name: String,
    pub instructor: String,
    pub class_date: ClassDate,
    pub start_time: ClassTime,
}

/// DTO for creating a booking.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBooking {
    pub user_id: DbId,
    pub class_id: DbId,
}

/// Optional listing filters for bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    /// Email of the user who made the booking.
    pub email: Option<String>,
    pub class_id: Option<DbId>,
}
