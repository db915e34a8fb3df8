pub mod bookings;
pub mod classes;
pub mod health;
pub mod reports;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                             list, create
/// /users/{id}                        get, update, delete
/// /users/{id}/bookings               bookings held by the user
///
/// /classes                           list (projected), create
/// /classes/{id}                      get (projected), update, delete
///
/// /bookings                          list (?email=), create
/// /bookings/details                  list joined with user and class
/// /bookings/{id}                     get, cancel
/// /bookings/{id}/detail              get joined with user and class
///
/// /reports/class-bookings            booking count per class
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/classes", classes::router())
        .nest("/bookings", bookings::router())
        .nest("/reports", reports::router())
}
