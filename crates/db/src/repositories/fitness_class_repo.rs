//! Repository for the `fitness_classes` table.

use fitstudio_core::error::CoreError;
use fitstudio_core::pagination::PageRequest;
use fitstudio_core::types::{new_id, DbId};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::error::{classify, RepoResult};
use crate::models::booking::{self, Booking};
use crate::models::fitness_class::{
    cols, CreateFitnessClass, FitnessClass, FitnessClassFilter, UpdateFitnessClass,
};
use crate::mutation::{Assignments, MutationExecutor};
use crate::query::{Filter, OrderBy, Predicate, QueryComposer};

const COLUMNS: &str =
    "id, name, instructor, class_date, start_time, available_slots, description, created_at";

/// Provides CRUD operations for fitness classes.
pub struct FitnessClassRepo;

impl FitnessClassRepo {
    /// Insert a new class, returning the created row.
    ///
    /// An instructor already scheduled at the same date and time yields
    /// `AlreadyExists`.
    pub async fn create(pool: &PgPool, input: &CreateFitnessClass) -> RepoResult<FitnessClass> {
        let query = format!(
            "INSERT INTO fitness_classes
                (id, name, instructor, class_date, start_time, available_slots, description)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let class = sqlx::query_as::<_, FitnessClass>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(&input.instructor)
            .bind(input.class_date)
            .bind(input.start_time)
            .bind(input.available_slots)
            .bind(&input.description)
            .fetch_one(pool)
            .await
            .map_err(classify)?;
        tracing::info!(
            class_id = %class.id,
            instructor = %class.instructor,
            slots = class.available_slots,
            "Fitness class created"
        );
        Ok(class)
    }

    pub async fn find_by_id<'c>(
        executor: impl PgExecutor<'c>,
        id: DbId,
    ) -> Result<Option<FitnessClass>, sqlx::Error> {
        QueryComposer::select::<FitnessClass>()
            .filter(Predicate::eq(cols::ID, id))
            .compose()
            .fetch_optional(executor)
            .await
    }

    /// Find a class by ID, failing with `NotFound` when absent.
    pub async fn get<'c>(executor: impl PgExecutor<'c>, id: DbId) -> RepoResult<FitnessClass> {
        Self::find_by_id(executor, id).await?.ok_or_else(|| {
            CoreError::NotFound {
                entity: "Fitness class",
                id,
            }
            .into()
        })
    }

    /// List one page of classes matching `filter`, in creation order.
    pub async fn list(
        pool: &PgPool,
        filter: &FitnessClassFilter,
        page: &PageRequest,
    ) -> Result<Vec<FitnessClass>, sqlx::Error> {
        QueryComposer::select::<FitnessClass>()
            .filters(listing_filter(filter))
            .order_by(OrderBy::asc(cols::CREATED_AT))
            .order_by(OrderBy::asc(cols::ID))
            .page(page)
            .compose()
            .fetch_all(pool)
            .await
    }

    /// Update a class. Only non-`None` fields in `input` are applied.
    ///
    /// Moving a class onto a slot the instructor already holds yields
    /// `AlreadyExists`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFitnessClass,
    ) -> RepoResult<FitnessClass> {
        let mut tx = pool.begin().await?;
        Self::get(&mut *tx, id).await?;

        let set = Assignments::new()
            .set_opt(cols::NAME, input.name.as_ref())
            .set_opt(cols::INSTRUCTOR, input.instructor.as_ref())
            .set_opt(cols::CLASS_DATE, input.class_date)
            .set_opt(cols::START_TIME, input.start_time)
            .set_opt(cols::AVAILABLE_SLOTS, input.available_slots)
            .set_opt(cols::DESCRIPTION, input.description.as_ref());
        MutationExecutor::update::<FitnessClass>(
            &mut *tx,
            &Filter::from(Predicate::eq(cols::ID, id)),
            &set,
        )
        .await
        .map_err(classify)?;

        let class = Self::get(&mut *tx, id).await?;
        tx.commit().await.map_err(classify)?;
        tracing::info!(class_id = %id, "Fitness class updated");
        Ok(class)
    }

    /// Delete a class and every booking made for it, in one transaction.
    ///
    /// The class row stays locked until commit, so a booking in flight
    /// either lands before the bookings are removed or finds no class.
    pub async fn delete(pool: &PgPool, id: DbId) -> RepoResult<()> {
        let mut tx = pool.begin().await?;
        Self::lock(&mut *tx, id).await?;

        let bookings = MutationExecutor::delete::<Booking>(
            &mut *tx,
            &Filter::from(Predicate::eq(booking::cols::CLASS_ID, id)),
        )
        .await?;
        MutationExecutor::delete::<FitnessClass>(
            &mut *tx,
            &Filter::from(Predicate::eq(cols::ID, id)),
        )
        .await?;

        tx.commit().await?;
        tracing::info!(class_id = %id, removed_bookings = bookings, "Fitness class deleted");
        Ok(())
    }

    async fn lock(conn: &mut PgConnection, id: DbId) -> RepoResult<FitnessClass> {
        QueryComposer::select::<FitnessClass>()
            .filter(Predicate::eq(cols::ID, id))
            .for_update()
            .compose()
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Fitness class",
                    id,
                }
                .into()
            })
    }
}

fn listing_filter(filter: &FitnessClassFilter) -> Filter {
    let dates = match (filter.from, filter.to) {
        (Some(from), Some(to)) => Some(Predicate::between(cols::CLASS_DATE, from, to)),
        (Some(from), None) => Some(Predicate::ge(cols::CLASS_DATE, from)),
        (None, Some(to)) => Some(Predicate::le(cols::CLASS_DATE, to)),
        (None, None) => None,
    };
    Filter::new()
        .and_maybe(
            filter
                .instructor
                .as_ref()
                .map(|i| Predicate::eq(cols::INSTRUCTOR, i)),
        )
        .and_maybe(dates)
        .and_maybe(
            filter
                .only_available
                .then(|| Predicate::gt(cols::AVAILABLE_SLOTS, 0)),
        )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn empty_listing_filter_has_no_predicates() {
        assert!(listing_filter(&FitnessClassFilter::default()).is_empty());
    }

    #[test]
    fn both_date_bounds_become_a_range() {
        let filter = listing_filter(&FitnessClassFilter {
            instructor: Some("Asha".into()),
            from: NaiveDate::from_ymd_opt(2024, 6, 1),
            to: NaiveDate::from_ymd_opt(2024, 6, 30),
            only_available: true,
        });
        assert_eq!(
            filter.predicates(),
            &[
                Predicate::eq(cols::INSTRUCTOR, "Asha"),
                Predicate::between(
                    cols::CLASS_DATE,
                    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
                ),
                Predicate::gt(cols::AVAILABLE_SLOTS, 0),
            ]
        );
    }

    #[test]
    fn single_date_bound_is_open_ended() {
        let from = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let filter = listing_filter(&FitnessClassFilter {
            from: Some(from),
            ..Default::default()
        });
        assert_eq!(filter.predicates(), &[Predicate::ge(cols::CLASS_DATE, from)]);
    }
}
