//! Read-query composition.
//!
//! [`QueryComposer::select`] starts a [`SelectQuery`] against a declared
//! [`Entity`]. Clauses may be supplied in any order; [`SelectQuery::compose`]
//! always applies them as joins, then filters, then ordering, then
//! grouping/having, then pagination. The resulting [`ComposedQuery`] is lazy:
//! nothing touches the database until the caller runs one of its `fetch_*`
//! methods.

use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor, Postgres, QueryBuilder};

use fitstudio_core::pagination::PageRequest;

use super::predicate::{Column, Comparison, Filter, Predicate, Value};

// ---------------------------------------------------------------------------
// Entity declaration
// ---------------------------------------------------------------------------

/// A table that queries can be composed against.
pub trait Entity {
    /// Table name.
    const TABLE: &'static str;
    /// Default output columns, unqualified and in `FromRow` order.
    const COLUMNS: &'static [&'static str];
}

// ---------------------------------------------------------------------------
// Clause types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// A joined table and its ON conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: &'static str,
    pub on: Filter,
}

impl Join {
    pub fn inner(table: &'static str, on: Predicate) -> Self {
        Self {
            kind: JoinKind::Inner,
            table,
            on: Filter::from(on),
        }
    }

    pub fn left(table: &'static str, on: Predicate) -> Self {
        Self {
            kind: JoinKind::Left,
            table,
            on: Filter::from(on),
        }
    }

    /// Add another ON condition.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.on = self.on.and(predicate);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: Column,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }
}

/// Aggregate expressions usable in HAVING.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    CountAll,
    Count(Column),
    Sum(Column),
    Min(Column),
    Max(Column),
}

impl Aggregate {
    fn push_sql(self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Aggregate::CountAll => qb.push("COUNT(*)"),
            Aggregate::Count(c) => qb.push("COUNT(").push(c).push(")"),
            Aggregate::Sum(c) => qb.push("SUM(").push(c).push(")"),
            Aggregate::Min(c) => qb.push("MIN(").push(c).push(")"),
            Aggregate::Max(c) => qb.push("MAX(").push(c).push(")"),
        };
    }
}

/// `aggregate <op> value`, applied after grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct HavingPredicate {
    pub aggregate: Aggregate,
    pub op: Comparison,
    pub value: Value,
}

impl HavingPredicate {
    pub fn new(aggregate: Aggregate, op: Comparison, value: impl Into<Value>) -> Self {
        Self {
            aggregate,
            op,
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// QueryComposer
// ---------------------------------------------------------------------------

/// Entry point for composing read queries.
pub struct QueryComposer;

impl QueryComposer {
    /// Start a query against entity `E`.
    pub fn select<E: Entity>() -> SelectQuery<E> {
        SelectQuery {
            columns: Vec::new(),
            joins: Vec::new(),
            filter: Filter::new(),
            order_by: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            offset: None,
            limit: None,
            for_update: false,
            _entity: PhantomData,
        }
    }
}

/// Clause set for a read query against `E`.
#[derive(Debug, Clone)]
pub struct SelectQuery<E: Entity> {
    columns: Vec<&'static str>,
    joins: Vec<Join>,
    filter: Filter,
    order_by: Vec<OrderBy>,
    group_by: Vec<Column>,
    having: Vec<HavingPredicate>,
    offset: Option<i64>,
    limit: Option<i64>,
    for_update: bool,
    _entity: PhantomData<E>,
}

impl<E: Entity> SelectQuery<E> {
    /// Replace the default output columns (the entity's own columns).
    ///
    /// Items are written verbatim, so aliases such as
    /// `"users.email AS user_email"` are allowed.
    pub fn columns(mut self, columns: &[&'static str]) -> Self {
        self.columns = columns.to_vec();
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add one predicate to the WHERE clause.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = self.filter.and(predicate);
        self
    }

    /// Add every predicate of `filter` to the WHERE clause.
    pub fn filters(mut self, filter: Filter) -> Self {
        self.filter = self.filter.merge(filter);
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn group_by(mut self, column: Column) -> Self {
        self.group_by.push(column);
        self
    }

    pub fn having(mut self, predicate: HavingPredicate) -> Self {
        self.having.push(predicate);
        self
    }

    /// Skip `offset` rows. Zero or negative applies no offset.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Return at most `limit` rows. Zero or negative applies no bound.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Apply a page request as offset/limit.
    pub fn page(self, page: &PageRequest) -> Self {
        self.offset(page.offset()).limit(page.limit())
    }

    /// Lock the selected rows until the surrounding transaction ends.
    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    /// Build the query text and bind parameters.
    pub fn compose(&self) -> ComposedQuery {
        let mut qb = QueryBuilder::<'static, Postgres>::new("SELECT ");
        self.push_columns(&mut qb);
        qb.push(" FROM ").push(E::TABLE);

        self.apply_joins(&mut qb);
        self.filter.push_clause(&mut qb, " WHERE ");
        self.apply_grouping(&mut qb);
        self.apply_order_by(&mut qb);
        self.apply_pagination(&mut qb);

        if self.for_update {
            qb.push(" FOR UPDATE");
        }

        ComposedQuery { builder: qb }
    }

    fn push_columns(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        if self.columns.is_empty() {
            for (i, column) in E::COLUMNS.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push(E::TABLE).push(".").push(*column);
            }
        } else {
            qb.push(self.columns.join(", "));
        }
    }

    fn apply_joins(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        for join in &self.joins {
            let keyword = match join.kind {
                JoinKind::Inner => " JOIN ",
                JoinKind::Left => " LEFT JOIN ",
            };
            qb.push(keyword).push(join.table);
            join.on.push_clause(qb, " ON ");
        }
    }

    // GROUP BY/HAVING is emitted ahead of ORDER BY as the SQL grammar requires.
    fn apply_grouping(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        if !self.group_by.is_empty() {
            qb.push(" GROUP BY ").push(self.group_by.join(", "));
        }
        for (i, having) in self.having.iter().enumerate() {
            qb.push(if i == 0 { " HAVING " } else { " AND " });
            having.aggregate.push_sql(qb);
            qb.push(" ").push(having.op.as_sql()).push(" ");
            having.value.push_bind(qb);
        }
    }

    fn apply_order_by(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        for (i, order) in self.order_by.iter().enumerate() {
            qb.push(if i == 0 { " ORDER BY " } else { ", " });
            qb.push(order.column);
            qb.push(match order.direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            });
        }
    }

    fn apply_pagination(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            qb.push(" LIMIT ").push_bind(limit);
        }
        if let Some(offset) = self.offset.filter(|o| *o > 0) {
            qb.push(" OFFSET ").push_bind(offset);
        }
    }
}

// ---------------------------------------------------------------------------
// ComposedQuery
// ---------------------------------------------------------------------------

/// A fully built, not yet executed query.
pub struct ComposedQuery {
    builder: QueryBuilder<'static, Postgres>,
}

impl ComposedQuery {
    /// The SQL text with `$n` placeholders.
    pub fn sql(&self) -> &str {
        self.builder.sql()
    }

    pub async fn fetch_all<'c, T, X>(mut self, executor: X) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
        X: PgExecutor<'c>,
    {
        tracing::trace!(sql = self.sql(), "fetch_all");
        self.builder.build_query_as::<T>().fetch_all(executor).await
    }

    pub async fn fetch_optional<'c, T, X>(mut self, executor: X) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
        X: PgExecutor<'c>,
    {
        tracing::trace!(sql = self.sql(), "fetch_optional");
        self.builder
            .build_query_as::<T>()
            .fetch_optional(executor)
            .await
    }

    pub async fn fetch_one<'c, T, X>(mut self, executor: X) -> Result<T, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
        X: PgExecutor<'c>,
    {
        tracing::trace!(sql = self.sql(), "fetch_one");
        self.builder.build_query_as::<T>().fetch_one(executor).await
    }
}
