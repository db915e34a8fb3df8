//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use fitstudio_core::error::CoreError;
use fitstudio_core::pagination::PageRequest;
use fitstudio_core::types::DbId;
use fitstudio_db::models::booking::BookingFilter;
use fitstudio_db::models::fitness_class::FitnessClassFilter;
use serde::Deserialize;

/// Page-based pagination parameters (`?page=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Validate into a [`PageRequest`] (page >= 1, limit in 1..=100).
    pub fn page_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::new(self.page, self.limit)
    }
}

/// `?timezone=` for reads that present class schedules.
#[derive(Debug, Default, Deserialize)]
pub struct TimezoneParams {
    pub timezone: Option<String>,
}

/// Query parameters for `GET /classes`.
#[derive(Debug, Default, Deserialize)]
pub struct ClassListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Target zone for `class_date`/`start_time` (default: studio zone).
    pub timezone: Option<String>,
    pub instructor: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub only_available: bool,
}

impl ClassListParams {
    pub fn page_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::new(self.page, self.limit)
    }

    pub fn filter(&self) -> FitnessClassFilter {
        FitnessClassFilter {
            instructor: non_empty(&self.instructor),
            from: self.from,
            to: self.to,
            only_available: self.only_available,
        }
    }
}

/// Query parameters for `GET /bookings`.
#[derive(Debug, Default, Deserialize)]
pub struct BookingListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Only bookings made by the user with this email.
    pub email: Option<String>,
    pub class_id: Option<DbId>,
}

impl BookingListParams {
    pub fn page_request(&self) -> Result<PageRequest, CoreError> {
        PageRequest::new(self.page, self.limit)
    }

    pub fn filter(&self) -> BookingFilter {
        BookingFilter {
            email: non_empty(&self.email),
            class_id: self.class_id,
        }
    }
}

/// `?key=` arrives as `Some("")`; treat it as an absent filter.
fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

/// Query parameters for `GET /reports/class-bookings`.
#[derive(Debug, Default, Deserialize)]
pub struct ClassBookingReportParams {
    pub min_bookings: Option<i64>,
}
