//! Handlers for the `/classes` resource.
//!
//! Class schedules are stored on the studio's wall clock. Reads accept an
//! optional `?timezone=` and present `class_date`/`start_time` in that zone
//! instead; stored values are never changed by a read.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono_tz::Tz;
use fitstudio_core::timezone::{parse_zone, TimezoneProjector};
use fitstudio_core::types::DbId;
use fitstudio_db::models::fitness_class::{
    CreateFitnessClass, FitnessClass, FitnessClassView, UpdateFitnessClass,
};
use fitstudio_db::repositories::FitnessClassRepo;

use crate::error::AppResult;
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::query::{ClassListParams, TimezoneParams};
use crate::response::{ActionResponse, DataResponse};
use crate::state::AppState;

/// POST /api/v1/classes
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateFitnessClass>,
) -> AppResult<(StatusCode, Json<ActionResponse>)> {
    let class = FitnessClassRepo::create(&state.pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new(
            class.id,
            "Successfully created new fitness class record",
        )),
    ))
}

/// GET /api/v1/classes
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ClassListParams>,
) -> AppResult<Json<DataResponse<Vec<FitnessClassView>>>> {
    let page = params.page_request()?;
    let zone = target_zone(&state.projector, params.timezone.as_deref())?;

    let classes = FitnessClassRepo::list(&state.pool, &params.filter(), &page).await?;
    let data = classes
        .into_iter()
        .map(|class| present(&state.projector, class, zone))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/classes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiQuery(params): ApiQuery<TimezoneParams>,
) -> AppResult<Json<DataResponse<FitnessClassView>>> {
    let zone = target_zone(&state.projector, params.timezone.as_deref())?;
    let class = FitnessClassRepo::get(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: present(&state.projector, class, zone),
    }))
}

/// PUT /api/v1/classes/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ValidJson(input): ValidJson<UpdateFitnessClass>,
) -> AppResult<Json<ActionResponse>> {
    let class = FitnessClassRepo::update(&state.pool, id, &input).await?;
    Ok(Json(ActionResponse::new(
        class.id,
        "Successfully updated fitness class record",
    )))
}

/// DELETE /api/v1/classes/{id}
///
/// Also removes every booking for the class.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ActionResponse>> {
    FitnessClassRepo::delete(&state.pool, id).await?;
    Ok(Json(ActionResponse::new(
        id,
        "Successfully deleted fitness class record",
    )))
}

/// Resolve the requested zone, falling back to the studio's own.
fn target_zone(projector: &TimezoneProjector, requested: Option<&str>) -> AppResult<Tz> {
    match requested {
        Some(name) => Ok(parse_zone(name)?),
        None => Ok(projector.source()),
    }
}

fn present(projector: &TimezoneProjector, class: FitnessClass, zone: Tz) -> FitnessClassView {
    let (date, time) = projector.project_to(class.class_date, class.start_time, zone);
    FitnessClassView::projected(class, date, time, zone.name())
}
