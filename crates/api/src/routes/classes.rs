//! Route definitions for the `/classes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::fitness_class;
use crate::state::AppState;

/// Routes mounted at `/classes`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fitness_class::list).post(fitness_class::create))
        .route(
            "/{id}",
            get(fitness_class::get_by_id)
                .put(fitness_class::update)
                .delete(fitness_class::delete),
        )
}
