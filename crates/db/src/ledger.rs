//! Capacity ledger: the booking transaction.
//!
//! A booking moves `Requested -> Validated -> Committed`, or to `Rejected`
//! from either of the first two states. Every step runs inside one
//! transaction; a rejection drops the transaction, which rolls back any
//! write already made (including the slot decrement).
//!
//! Overselling is prevented twice over: the class row is locked with
//! `FOR UPDATE` before it is inspected, and the decrement itself is a
//! guarded update that only matches while `available_slots > 0`.

use fitstudio_core::booking::{ensure_slot_available, BookingState, MAX_SLOTS};
use fitstudio_core::error::CoreError;
use fitstudio_core::types::{new_id, ClassDate, DbId};
use sqlx::{PgConnection, PgPool};

use crate::error::{classify, is_foreign_key_violation, RepoError, RepoResult};
use crate::models::booking::{self, Booking, CreateBooking};
use crate::models::fitness_class::{self, FitnessClass};
use crate::mutation::{Assignments, MutationExecutor};
use crate::query::{Filter, Predicate, QueryComposer};
use crate::repositories::UserRepo;

/// Column list for INSERT ... RETURNING.
const BOOKING_COLUMNS: &str = "id, user_id, class_id, booked_at, created_at";

/// Books and releases class slots.
pub struct CapacityLedger;

impl CapacityLedger {
    /// Reserve one slot of `input.class_id` for `input.user_id`.
    ///
    /// `booked_at` is the studio-local date recorded on the booking.
    ///
    /// Errors:
    /// - `NotFound` if the class or the user does not exist
    /// - `CapacityExhausted` if the class has no free slot
    /// - `AlreadyExists` if the user already holds a booking for the class
    pub async fn book(
        pool: &PgPool,
        input: &CreateBooking,
        booked_at: ClassDate,
    ) -> RepoResult<Booking> {
        let class_id = input.class_id;
        let user_id = input.user_id;
        let state = BookingState::Requested;
        let mut tx = pool.begin().await?;

        let class: Option<FitnessClass> = QueryComposer::select::<FitnessClass>()
            .filter(Predicate::eq(fitness_class::cols::ID, class_id))
            .for_update()
            .compose()
            .fetch_optional(&mut *tx)
            .await?;
        let Some(class) = class else {
            return Err(reject(
                state,
                class_id,
                CoreError::NotFound {
                    entity: "Fitness class",
                    id: class_id,
                }
                .into(),
            ));
        };

        if UserRepo::find_by_id(&mut *tx, user_id).await?.is_none() {
            return Err(reject(
                state,
                class_id,
                CoreError::NotFound {
                    entity: "User",
                    id: user_id,
                }
                .into(),
            ));
        }

        if let Err(e) = ensure_slot_available(class.id, class.available_slots) {
            return Err(reject(state, class_id, e.into()));
        }
        let state = advance(state, BookingState::Validated, class_id);

        let decrement = Filter::new()
            .and(Predicate::eq(fitness_class::cols::ID, class_id))
            .and(Predicate::gt(fitness_class::cols::AVAILABLE_SLOTS, 0));
        let affected = MutationExecutor::update::<FitnessClass>(
            &mut *tx,
            &decrement,
            &Assignments::new().adjust(fitness_class::cols::AVAILABLE_SLOTS, -1),
        )
        .await?;
        if affected == 0 {
            return Err(reject(
                state,
                class_id,
                CoreError::CapacityExhausted { class_id }.into(),
            ));
        }

        let query = format!(
            "INSERT INTO bookings (id, user_id, class_id, booked_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {BOOKING_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Booking>(&query)
            .bind(new_id())
            .bind(user_id)
            .bind(class_id)
            .bind(booked_at)
            .fetch_one(&mut *tx)
            .await;
        let booking = match inserted {
            Ok(booking) => booking,
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(reject(
                    state,
                    class_id,
                    CoreError::NotFound {
                        entity: "User",
                        id: user_id,
                    }
                    .into(),
                ));
            }
            Err(e) => return Err(reject(state, class_id, classify(e))),
        };

        tx.commit().await.map_err(classify)?;
        advance(state, BookingState::Committed, class_id);
        tracing::info!(
            booking_id = %booking.id,
            user_id = %user_id,
            class_id = %class_id,
            remaining = class.available_slots - 1,
            "Booking committed"
        );
        Ok(booking)
    }

    /// Cancel a booking and hand its slot back to the class.
    ///
    /// Returns the deleted booking. Errors with `NotFound` if it does not exist.
    pub async fn release(pool: &PgPool, booking_id: DbId) -> RepoResult<Booking> {
        let mut tx = pool.begin().await?;

        let booking: Booking = QueryComposer::select::<Booking>()
            .filter(Predicate::eq(booking::cols::ID, booking_id))
            .for_update()
            .compose()
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Booking",
                id: booking_id,
            })?;

        MutationExecutor::delete::<Booking>(
            &mut *tx,
            &Filter::from(Predicate::eq(booking::cols::ID, booking_id)),
        )
        .await?;
        return_slots(&mut *tx, vec![booking.class_id]).await?;

        tx.commit().await?;
        tracing::info!(
            booking_id = %booking_id,
            class_id = %booking.class_id,
            "Booking released"
        );
        Ok(booking)
    }

    /// Delete every booking held by `user_id` and release their slots.
    ///
    /// Runs on the caller's connection so it joins the caller's transaction.
    /// Returns the number of bookings released.
    pub async fn release_all_for_user(conn: &mut PgConnection, user_id: DbId) -> RepoResult<u64> {
        let held: Vec<Booking> = QueryComposer::select::<Booking>()
            .filter(Predicate::eq(booking::cols::USER_ID, user_id))
            .for_update()
            .compose()
            .fetch_all(&mut *conn)
            .await?;
        if held.is_empty() {
            return Ok(0);
        }

        let released = MutationExecutor::delete::<Booking>(
            &mut *conn,
            &Filter::from(Predicate::eq(booking::cols::USER_ID, user_id)),
        )
        .await?;
        return_slots(conn, held.into_iter().map(|b| b.class_id).collect()).await?;

        tracing::debug!(user_id = %user_id, released, "Released bookings for user");
        Ok(released)
    }
}

/// Add one slot back to each class in `class_ids`.
///
/// A class holds at most one booking per user, so each id appears once.
/// Classes already at the ceiling are left unchanged.
async fn return_slots(conn: &mut PgConnection, class_ids: Vec<DbId>) -> Result<u64, sqlx::Error> {
    let filter = Filter::new()
        .and(Predicate::in_list(fitness_class::cols::ID, class_ids))
        .and(Predicate::lt(fitness_class::cols::AVAILABLE_SLOTS, MAX_SLOTS));
    MutationExecutor::update::<FitnessClass>(
        conn,
        &filter,
        &Assignments::new().adjust(fitness_class::cols::AVAILABLE_SLOTS, 1),
    )
    .await
}

fn advance(from: BookingState, to: BookingState, class_id: DbId) -> BookingState {
    debug_assert!(from.can_transition(to), "illegal booking transition");
    tracing::debug!(class_id = %class_id, from = ?from, to = ?to, "Booking state");
    to
}

fn reject(from: BookingState, class_id: DbId, err: RepoError) -> RepoError {
    advance(from, BookingState::Rejected, class_id);
    tracing::info!(class_id = %class_id, error = %err, "Booking rejected");
    err
}
