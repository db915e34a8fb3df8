//! Fitness class entity model and DTOs.

use fitstudio_core::booking::{MAX_SLOTS, MIN_SLOTS};
use fitstudio_core::types::{ClassDate, ClassTime, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::query::Entity;

/// A fitness class row from the `fitness_classes` table.
///
/// `class_date` and `start_time` are wall-clock values in the studio's
/// timezone.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FitnessClass {
    pub id: DbId,
    pub name: String,
    pub instructor: String,
    pub class_date: ClassDate,
    pub start_time: ClassTime,
    pub available_slots: i32,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

impl Entity for FitnessClass {
    const TABLE: &'static str = "fitness_classes";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "instructor",
        "class_date",
        "start_time",
        "available_slots",
        "description",
        "created_at",
    ];
}

/// Qualified `fitness_classes` columns for predicates and ordering.
pub mod cols {
    pub const ID: &str = "fitness_classes.id";
    pub const NAME: &str = "fitness_classes.name";
    pub const INSTRUCTOR: &str = "fitness_classes.instructor";
    pub const CLASS_DATE: &str = "fitness_classes.class_date";
    pub const START_TIME: &str = "fitness_classes.start_time";
    pub const AVAILABLE_SLOTS: &str = "fitness_classes.available_slots";
    pub const DESCRIPTION: &str = "fitness_classes.description";
    pub const CREATED_AT: &str = "fitness_classes.created_at";
}

/// A class as presented to clients, with its schedule projected into the
/// requested timezone.
#[derive(Debug, Clone, Serialize)]
pub struct FitnessClassView {
    pub id: DbId,
    pub name: String,
    pub instructor: String,
    pub class_date: ClassDate,
    pub start_time: ClassTime,
    /// Zone that `class_date`/`start_time` are expressed in.
    pub timezone: String,
    pub available_slots: i32,
    pub description: Option<String>,
}

impl FitnessClassView {
    /// Present `class` with an already projected schedule.
    pub fn projected(
        class: FitnessClass,
        class_date: ClassDate,
        start_time: ClassTime,
        timezone: &str,
    ) -> Self {
        Self {
            id: class.id,
            name: class.name,
            instructor: class.instructor,
            class_date,
            start_time,
            timezone: timezone.to_string(),
            available_slots: class.available_slots,
            description: class.description,
        }
    }
}

/// DTO for creating a new fitness class.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFitnessClass {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub instructor: String,
    pub class_date: ClassDate,
    pub start_time: ClassTime,
    #[validate(range(min = MIN_SLOTS, max = MAX_SLOTS, message = "must be between 0 and 1000"))]
    pub available_slots: i32,
    pub description: Option<String>,
}

/// DTO for updating an existing fitness class. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateFitnessClass {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub instructor: Option<String>,
    pub class_date: Option<ClassDate>,
    pub start_time: Option<ClassTime>,
    #[validate(range(min = MIN_SLOTS, max = MAX_SLOTS, message = "must be between 0 and 1000"))]
    pub available_slots: Option<i32>,
    pub description: Option<String>,
}

/// Optional listing filters for classes.
#[derive(Debug, Clone, Default)]
pub struct FitnessClassFilter {
    pub instructor: Option<String>,
    /// Earliest class date (inclusive).
    pub from: Option<ClassDate>,
    /// Latest class date (inclusive).
    pub to: Option<ClassDate>,
    /// Only classes with at least one free slot.
    pub only_available: bool,
}

/// Number of bookings held by a class.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassBookingCount {
    pub class_id: DbId,
    pub class_name: String,
    pub booking_count: i64,
}
