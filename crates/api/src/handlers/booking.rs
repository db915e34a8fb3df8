//! Handlers for the `/bookings` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fitstudio_core::types::DbId;
use fitstudio_db::ledger::CapacityLedger;
use fitstudio_db::models::booking::{Booking, BookingDetail, CreateBooking};
use fitstudio_db::repositories::BookingRepo;

use crate::error::AppResult;
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::query::BookingListParams;
use crate::response::{ActionResponse, DataResponse};
use crate::state::AppState;

/// POST /api/v1/bookings
///
/// The booking date is today's date on the studio's clock.
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateBooking>,
) -> AppResult<(StatusCode, Json<ActionResponse>)> {
    let booking = CapacityLedger::book(&state.pool, &input, state.projector.today()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new(
            booking.id,
            "Successfully booked a spot in the fitness class",
        )),
    ))
}

/// GET /api/v1/bookings
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BookingListParams>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let page = params.page_request()?;
    let bookings = BookingRepo::list(&state.pool, &params.filter(), &page).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/details
pub async fn list_details(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BookingListParams>,
) -> AppResult<Json<DataResponse<Vec<BookingDetail>>>> {
    let page = params.page_request()?;
    let details = BookingRepo::list_details(&state.pool, &params.filter(), &page).await?;
    Ok(Json(DataResponse { data: details }))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Booking>>> {
    let booking = BookingRepo::get(&state.pool, id).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// GET /api/v1/bookings/{id}/detail
pub async fn get_detail(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<BookingDetail>>> {
    let detail = BookingRepo::get_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/bookings/{id}
///
/// Cancels the booking and returns its slot to the class.
pub async fn cancel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ActionResponse>> {
    let booking = CapacityLedger::release(&state.pool, id).await?;
    Ok(Json(ActionResponse::new(
        booking.id,
        "Successfully cancelled booking",
    )))
}
