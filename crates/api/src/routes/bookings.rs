//! Route definitions for the `/bookings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /details        -> list_details
/// GET    /{id}           -> get_by_id
/// DELETE /{id}           -> cancel
/// GET    /{id}/detail    -> get_detail
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(booking::list).post(booking::create))
        .route("/details", get(booking::list_details))
        .route("/{id}", get(booking::get_by_id).delete(booking::cancel))
        .route("/{id}/detail", get(booking::get_detail))
}
