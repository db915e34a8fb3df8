//! Handlers for the `/reports` resource.

use axum::extract::State;
use axum::Json;
use fitstudio_core::error::CoreError;
use fitstudio_db::models::fitness_class::ClassBookingCount;
use fitstudio_db::repositories::BookingRepo;

use crate::error::AppResult;
use crate::extract::ApiQuery;
use crate::query::ClassBookingReportParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/reports/class-bookings
pub async fn class_bookings(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ClassBookingReportParams>,
) -> AppResult<Json<DataResponse<Vec<ClassBookingCount>>>> {
    let min_bookings = params.min_bookings.unwrap_or(1);
    if min_bookings < 1 {
        return Err(CoreError::Validation(format!(
            "min_bookings must be at least 1, got {min_bookings}"
        ))
        .into());
    }
    let counts = BookingRepo::class_booking_counts(&state.pool, min_bookings).await?;
    Ok(Json(DataResponse { data: counts }))
}
