//! Repository for the `bookings` table.
//!
//! Bookings are created and cancelled through
//! [`CapacityLedger`](crate::ledger::CapacityLedger); this repository only
//! reads them.

use fitstudio_core::error::CoreError;
use fitstudio_core::pagination::PageRequest;
use fitstudio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::error::RepoResult;
use crate::models::booking::{cols, Booking, BookingDetail, BookingFilter};
use crate::models::fitness_class::{self, ClassBookingCount};
use crate::models::user;
use crate::query::{
    Aggregate, Comparison, Entity, HavingPredicate, Join, OrderBy, Predicate, QueryComposer,
    SelectQuery,
};
use crate::repositories::UserRepo;

/// Output columns of [`BookingDetail`], aliased to its field names.
const DETAIL_COLUMNS: &[&str] = &[
    "bookings.id",
    "bookings.booked_at",
    "users.id AS user_id",
    "users.name AS user_name",
    "users.email AS user_email",
    "fitness_classes.id AS class_id",
    "fitness_classes.name AS class_name",
    "fitness_classes.instructor",
    "fitness_classes.class_date",
    "fitness_classes.start_time",
];

/// Provides read access to bookings.
pub struct BookingRepo;

impl BookingRepo {
    pub async fn find_by_id<'c>(
        executor: impl PgExecutor<'c>,
        id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        QueryComposer::select::<Booking>()
            .filter(Predicate::eq(cols::ID, id))
            .compose()
            .fetch_optional(executor)
            .await
    }

    /// Find a booking by ID, failing with `NotFound` when absent.
    pub async fn get<'c>(executor: impl PgExecutor<'c>, id: DbId) -> RepoResult<Booking> {
        Self::find_by_id(executor, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Booking", id }.into())
    }

    /// List one page of bookings in creation order.
    ///
    /// An email filter joins `users` and matches the booking user's email
    /// exactly.
    pub async fn list(
        pool: &PgPool,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let mut query = QueryComposer::select::<Booking>();
        if let Some(email) = &filter.email {
            query = query
                .join(join_users())
                .filter(Predicate::eq(user::cols::EMAIL, email));
        }
        if let Some(class_id) = filter.class_id {
            query = query.filter(Predicate::eq(cols::CLASS_ID, class_id));
        }
        in_creation_order(query)
            .page(page)
            .compose()
            .fetch_all(pool)
            .await
    }

    /// List one page of the bookings held by a user.
    ///
    /// Errors with `NotFound` if the user does not exist.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        page: &PageRequest,
    ) -> RepoResult<Vec<Booking>> {
        UserRepo::get(pool, user_id).await?;
        let query = QueryComposer::select::<Booking>()
            .filter(Predicate::eq(cols::USER_ID, user_id));
        Ok(in_creation_order(query)
            .page(page)
            .compose()
            .fetch_all(pool)
            .await?)
    }

    /// A booking with its user and class, loaded in one joined query.
    pub async fn get_detail(pool: &PgPool, id: DbId) -> RepoResult<BookingDetail> {
        detail_query()
            .filter(Predicate::eq(cols::ID, id))
            .compose()
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Booking", id }.into())
    }

    /// One page of booking details, with the same filters as [`Self::list`].
    pub async fn list_details(
        pool: &PgPool,
        filter: &BookingFilter,
        page: &PageRequest,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let mut query = detail_query();
        if let Some(email) = &filter.email {
            query = query.filter(Predicate::eq(user::cols::EMAIL, email));
        }
        if let Some(class_id) = filter.class_id {
            query = query.filter(Predicate::eq(cols::CLASS_ID, class_id));
        }
        in_creation_order(query)
            .page(page)
            .compose()
            .fetch_all(pool)
            .await
    }

    /// Booking count per class, keeping classes with at least
    /// `min_bookings` bookings. Busiest classes first.
    ///
    /// Classes without any booking never appear.
    pub async fn class_booking_counts(
        pool: &PgPool,
        min_bookings: i64,
    ) -> Result<Vec<ClassBookingCount>, sqlx::Error> {
        QueryComposer::select::<Booking>()
            .columns(&[
                "fitness_classes.id AS class_id",
                "fitness_classes.name AS class_name",
                "COUNT(bookings.id) AS booking_count",
            ])
            .join(join_classes())
            .group_by(fitness_class::cols::ID)
            .group_by(fitness_class::cols::NAME)
            .having(HavingPredicate::new(
                Aggregate::Count(cols::ID),
                Comparison::Ge,
                min_bookings,
            ))
            .order_by(OrderBy::desc("booking_count"))
            .order_by(OrderBy::asc(fitness_class::cols::ID))
            .compose()
            .fetch_all(pool)
            .await
    }
}

fn join_users() -> Join {
    Join::inner(
        user::User::TABLE,
        Predicate::columns_eq(user::cols::ID, cols::USER_ID),
    )
}

fn join_classes() -> Join {
    Join::inner(
        fitness_class::FitnessClass::TABLE,
        Predicate::columns_eq(fitness_class::cols::ID, cols::CLASS_ID),
    )
}

fn detail_query() -> SelectQuery<Booking> {
    QueryComposer::select::<Booking>()
        .columns(DETAIL_COLUMNS)
        .join(join_users())
        .join(join_classes())
}

fn in_creation_order(query: SelectQuery<Booking>) -> SelectQuery<Booking> {
    query
        .order_by(OrderBy::asc(cols::CREATED_AT))
        .order_by(OrderBy::asc(cols::ID))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_query_joins_users_then_classes() {
        let sql = detail_query()
            .filter(Predicate::eq(cols::ID, uuid::Uuid::nil()))
            .compose()
            .sql()
            .to_string();
        assert!(sql.contains(
            "FROM bookings JOIN users ON users.id = bookings.user_id \
             JOIN fitness_classes ON fitness_classes.id = bookings.class_id \
             WHERE bookings.id = $1"
        ));
        assert!(sql.starts_with("SELECT bookings.id, bookings.booked_at, users.id AS user_id"));
    }
}
