//! Capacity rules and uniqueness constraints for classes and bookings.
//!
//! Lives in `core` (zero internal deps) so the repository layer and the API
//! agree on slot bounds, constraint names and conflict messages.

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Slot bounds
// ---------------------------------------------------------------------------

/// Smallest allowed `available_slots` value.
pub const MIN_SLOTS: i32 = 0;

/// Largest allowed `available_slots` value.
pub const MAX_SLOTS: i32 = 1000;

/// Ensure a class still has a slot to hand out.
pub fn ensure_slot_available(class_id: DbId, available_slots: i32) -> Result<(), CoreError> {
    if available_slots <= 0 {
        return Err(CoreError::CapacityExhausted { class_id });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unique constraints
// ---------------------------------------------------------------------------

/// `users (email)`.
pub const UQ_USER_EMAIL: &str = "uq_users_email";

/// `fitness_classes (instructor, class_date, start_time)`.
pub const UQ_INSTRUCTOR_SCHEDULE: &str = "uq_fitness_classes_instructor_schedule";

/// `bookings (user_id, class_id)`.
pub const UQ_USER_CLASS_BOOKING: &str = "uq_bookings_user_class";

/// Human-readable conflict message for a violated unique constraint.
///
/// Returns `None` for constraints this module does not know about.
pub fn conflict_message(constraint: &str) -> Option<&'static str> {
    match constraint {
        UQ_USER_EMAIL => Some("A user with this email already exists"),
        UQ_INSTRUCTOR_SCHEDULE => Some("Instructor is already scheduled at that date and time"),
        UQ_USER_CLASS_BOOKING => Some("You have already reserved a spot in this fitness class"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Booking lifecycle
// ---------------------------------------------------------------------------

/// States of a booking request as it moves through the capacity ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    /// Received, class not yet inspected.
    Requested,
    /// Class exists and had a free slot when inspected.
    Validated,
    /// Booking row inserted and slot consumed; transaction committed.
    Committed,
    /// Refused; nothing was written.
    Rejected,
}

impl BookingState {
    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition(self, next: BookingState) -> bool {
        matches!(
            (self, next),
            (BookingState::Requested, BookingState::Validated)
                | (BookingState::Requested, BookingState::Rejected)
                | (BookingState::Validated, BookingState::Committed)
                | (BookingState::Validated, BookingState::Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingState::Committed | BookingState::Rejected)
    }
}
