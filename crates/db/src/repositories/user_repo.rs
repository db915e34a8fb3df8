//! Repository for the `users` table.

use fitstudio_core::error::CoreError;
use fitstudio_core::pagination::PageRequest;
use fitstudio_core::types::{new_id, DbId};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::error::{classify, RepoResult};
use crate::ledger::CapacityLedger;
use crate::models::user::{cols, CreateUser, UpdateUser, User};
use crate::mutation::{Assignments, MutationExecutor};
use crate::query::{Filter, OrderBy, Predicate, QueryComposer};

/// Column list for INSERT ... RETURNING.
const COLUMNS: &str = "id, name, email, created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate email yields `AlreadyExists`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> RepoResult<User> {
        let query = format!(
            "INSERT INTO users (id, name, email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(&input.email)
            .fetch_one(pool)
            .await
            .map_err(classify)?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Find a user by ID.
    pub async fn find_by_id<'c>(
        executor: impl PgExecutor<'c>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        QueryComposer::select::<User>()
            .filter(Predicate::eq(cols::ID, id))
            .compose()
            .fetch_optional(executor)
            .await
    }

    /// Find a user by ID, failing with `NotFound` when absent.
    pub async fn get<'c>(executor: impl PgExecutor<'c>, id: DbId) -> RepoResult<User> {
        Self::find_by_id(executor, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "User", id }.into())
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        QueryComposer::select::<User>()
            .filter(Predicate::eq(cols::EMAIL, email))
            .compose()
            .fetch_optional(pool)
            .await
    }

    /// List one page of users in creation order.
    pub async fn list(pool: &PgPool, page: &PageRequest) -> Result<Vec<User>, sqlx::Error> {
        QueryComposer::select::<User>()
            .order_by(OrderBy::asc(cols::CREATED_AT))
            .order_by(OrderBy::asc(cols::ID))
            .page(page)
            .compose()
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Runs in one transaction: existence check, update, re-read.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateUser) -> RepoResult<User> {
        let mut tx = pool.begin().await?;
        Self::get(&mut *tx, id).await?;

        let set = Assignments::new()
            .set_opt(cols::NAME, input.name.as_ref())
            .set_opt(cols::EMAIL, input.email.as_ref());
        MutationExecutor::update::<User>(&mut *tx, &Filter::from(Predicate::eq(cols::ID, id)), &set)
            .await
            .map_err(classify)?;

        let user = Self::get(&mut *tx, id).await?;
        tx.commit().await.map_err(classify)?;
        tracing::info!(user_id = %id, "User updated");
        Ok(user)
    }

    /// Delete a user together with their bookings.
    ///
    /// Each deleted booking hands its slot back to the class. Everything
    /// happens in one transaction. The user row is locked first, which
    /// makes a concurrent booking insert wait for this delete to finish.
    pub async fn delete(pool: &PgPool, id: DbId) -> RepoResult<()> {
        let mut tx = pool.begin().await?;
        Self::lock(&mut *tx, id).await?;

        let released = CapacityLedger::release_all_for_user(&mut *tx, id).await?;
        MutationExecutor::delete::<User>(&mut *tx, &Filter::from(Predicate::eq(cols::ID, id)))
            .await?;

        tx.commit().await?;
        tracing::info!(user_id = %id, released_bookings = released, "User deleted");
        Ok(())
    }

    async fn lock(conn: &mut PgConnection, id: DbId) -> RepoResult<User> {
        QueryComposer::select::<User>()
            .filter(Predicate::eq(cols::ID, id))
            .for_update()
            .compose()
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "User", id }.into())
    }
}
