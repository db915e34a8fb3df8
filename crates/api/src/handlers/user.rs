//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fitstudio_core::types::DbId;
use fitstudio_db::models::booking::Booking;
use fitstudio_db::models::user::{CreateUser, UpdateUser, User};
use fitstudio_db::repositories::{BookingRepo, UserRepo};

use crate::error::AppResult;
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::query::PaginationParams;
use crate::response::{ActionResponse, DataResponse};
use crate::state::AppState;

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateUser>,
) -> AppResult<(StatusCode, Json<ActionResponse>)> {
    let user = UserRepo::create(&state.pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new(
            user.id,
            "Successfully created new user record",
        )),
    ))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let page = params.page_request()?;
    let users = UserRepo::list(&state.pool, &page).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::get(&state.pool, id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ValidJson(input): ValidJson<UpdateUser>,
) -> AppResult<Json<ActionResponse>> {
    let user = UserRepo::update(&state.pool, id, &input).await?;
    Ok(Json(ActionResponse::new(
        user.id,
        "Successfully updated user record",
    )))
}

/// DELETE /api/v1/users/{id}
///
/// Also removes the user's bookings and frees their slots.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ActionResponse>> {
    UserRepo::delete(&state.pool, id).await?;
    Ok(Json(ActionResponse::new(id, "Successfully deleted user record")))
}

/// GET /api/v1/users/{id}/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let page = params.page_request()?;
    let bookings = BookingRepo::list_for_user(&state.pool, id, &page).await?;
    Ok(Json(DataResponse { data: bookings }))
}
