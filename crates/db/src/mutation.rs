//! Bulk UPDATE / DELETE against an AND-combined predicate set.
//!
//! The executor does no validation and no existence checks. It returns the
//! number of affected rows and leaves the meaning of zero to the caller.

use sqlx::{PgExecutor, Postgres, QueryBuilder};

use crate::query::{Column, Entity, Filter, Value};

/// A single `SET` item.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// `column = value`
    Set(Column, Value),
    /// `column = NULL`
    SetNull(Column),
    /// `column = column + delta`
    Adjust(Column, i32),
}

impl Assignment {
    fn column(&self) -> Column {
        let column = match self {
            Assignment::Set(c, _) | Assignment::SetNull(c) | Assignment::Adjust(c, _) => *c,
        };
        // SET targets cannot be table-qualified in PostgreSQL.
        column.rsplit('.').next().unwrap_or(column)
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        let column = self.column();
        qb.push(column).push(" = ");
        match self {
            Assignment::Set(_, value) => value.push_bind(qb),
            Assignment::SetNull(_) => {
                qb.push("NULL");
            }
            Assignment::Adjust(_, delta) => {
                qb.push(column).push(" + ").push_bind(*delta);
            }
        }
    }
}

/// Ordered list of `SET` items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignments {
    items: Vec<Assignment>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: Column, value: impl Into<Value>) -> Self {
        self.items.push(Assignment::Set(column, value.into()));
        self
    }

    /// Set `column` only when a value is present (PATCH-style updates).
    pub fn set_opt<V: Into<Value>>(self, column: Column, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn set_null(mut self, column: Column) -> Self {
        self.items.push(Assignment::SetNull(column));
        self
    }

    pub fn adjust(mut self, column: Column, delta: i32) -> Self {
        self.items.push(Assignment::Adjust(column, delta));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Applies bulk mutations to an entity's table.
pub struct MutationExecutor;

impl MutationExecutor {
    /// `UPDATE <table> SET ... WHERE <filter>`, returning the affected row count.
    ///
    /// An empty assignment list executes nothing and returns 0.
    pub async fn update<'c, E: Entity>(
        executor: impl PgExecutor<'c>,
        filter: &Filter,
        assignments: &Assignments,
    ) -> Result<u64, sqlx::Error> {
        let Some(mut qb) = build_update::<E>(filter, assignments) else {
            return Ok(0);
        };
        let result = qb.build().execute(executor).await?;
        tracing::debug!(
            table = E::TABLE,
            affected = result.rows_affected(),
            "Bulk update applied"
        );
        Ok(result.rows_affected())
    }

    /// `DELETE FROM <table> WHERE <filter>`, returning the affected row count.
    pub async fn delete<'c, E: Entity>(
        executor: impl PgExecutor<'c>,
        filter: &Filter,
    ) -> Result<u64, sqlx::Error> {
        let mut qb = build_delete::<E>(filter);
        let result = qb.build().execute(executor).await?;
        tracing::debug!(
            table = E::TABLE,
            affected = result.rows_affected(),
            "Bulk delete applied"
        );
        Ok(result.rows_affected())
    }
}

fn build_update<E: Entity>(
    filter: &Filter,
    assignments: &Assignments,
) -> Option<QueryBuilder<'static, Postgres>> {
    if assignments.is_empty() {
        return None;
    }
    let mut qb = QueryBuilder::<'static, Postgres>::new("UPDATE ");
    qb.push(E::TABLE).push(" SET ");
    for (i, item) in assignments.items.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        item.push_sql(&mut qb);
    }
    filter.push_clause(&mut qb, " WHERE ");
    Some(qb)
}

fn build_delete<E: Entity>(filter: &Filter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<'static, Postgres>::new("DELETE FROM ");
    qb.push(E::TABLE);
    filter.push_clause(&mut qb, " WHERE ");
    qb
}
