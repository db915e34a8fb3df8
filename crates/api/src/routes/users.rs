//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/bookings    -> list_bookings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list).post(user::create))
        .route(
            "/{id}",
            get(user::get_by_id).put(user::update).delete(user::delete),
        )
        .route("/{id}/bookings", get(user::list_bookings))
}
