//! Typed filter predicates.
//!
//! Predicates form a closed set (comparison, range, membership, null test,
//! column equality). A [`Filter`] AND-combines them. Values are always
//! rendered as bind parameters; only `&'static str` column identifiers are
//! written into the SQL text.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use fitstudio_core::types::Timestamp;

/// A column reference, optionally qualified (`"users.email"`).
pub type Column = &'static str;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A bindable scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Uuid(Uuid),
    Text(String),
    Int(i32),
    BigInt(i64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(Timestamp),
}

impl Value {
    /// Append `self` to `qb` as a bind parameter.
    pub(crate) fn push_bind(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Value::Uuid(v) => qb.push_bind(*v),
            Value::Text(v) => qb.push_bind(v.clone()),
            Value::Int(v) => qb.push_bind(*v),
            Value::BigInt(v) => qb.push_bind(*v),
            Value::Bool(v) => qb.push_bind(*v),
            Value::Date(v) => qb.push_bind(*v),
            Value::Time(v) => qb.push_bind(*v),
            Value::Timestamp(v) => qb.push_bind(*v),
        };
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<Timestamp> for Value {
    fn from(v: Timestamp) -> Self {
        Value::Timestamp(v)
    }
}

// ---------------------------------------------------------------------------
// Comparison operators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// A single boolean condition over one or two columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> value`
    Compare {
        column: Column,
        op: Comparison,
        value: Value,
    },
    /// `column BETWEEN low AND high` (inclusive).
    Between {
        column: Column,
        low: Value,
        high: Value,
    },
    /// `column IN (values...)`. An empty list matches nothing.
    In { column: Column, values: Vec<Value> },
    /// `column IS NULL`
    IsNull(Column),
    /// `column IS NOT NULL`
    IsNotNull(Column),
    /// `left = right`, typically a join condition.
    ColumnsEqual(Column, Column),
}

impl Predicate {
    pub fn compare(column: Column, op: Comparison, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            column,
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Eq, value)
    }

    pub fn ne(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Ne, value)
    }

    pub fn lt(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Lt, value)
    }

    pub fn le(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Le, value)
    }

    pub fn gt(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Gt, value)
    }

    pub fn ge(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Ge, value)
    }

    pub fn between(column: Column, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Predicate::Between {
            column,
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn in_list<V: Into<Value>>(column: Column, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::In {
            column,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn columns_eq(left: Column, right: Column) -> Self {
        Predicate::ColumnsEqual(left, right)
    }

    pub(crate) fn push_sql(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Predicate::Compare { column, op, value } => {
                qb.push(*column).push(" ").push(op.as_sql()).push(" ");
                value.push_bind(qb);
            }
            Predicate::Between { column, low, high } => {
                qb.push(*column).push(" BETWEEN ");
                low.push_bind(qb);
                qb.push(" AND ");
                high.push_bind(qb);
            }
            Predicate::In { values, .. } if values.is_empty() => {
                qb.push("FALSE");
            }
            Predicate::In { column, values } => {
                qb.push(*column).push(" IN (");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    value.push_bind(qb);
                }
                qb.push(")");
            }
            Predicate::IsNull(column) => {
                qb.push(*column).push(" IS NULL");
            }
            Predicate::IsNotNull(column) => {
                qb.push(*column).push(" IS NOT NULL");
            }
            Predicate::ColumnsEqual(left, right) => {
                qb.push(*left).push(" = ").push(*right);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// An AND-combined set of predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate.
    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add a predicate only when one is given.
    pub fn and_maybe(mut self, predicate: Option<Predicate>) -> Self {
        self.predicates.extend(predicate);
        self
    }

    /// Append every predicate of `other`.
    pub fn merge(mut self, other: Filter) -> Self {
        self.predicates.extend(other.predicates);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Render `<keyword> p1 AND p2 ...`, or nothing when empty.
    pub(crate) fn push_clause(&self, qb: &mut QueryBuilder<'static, Postgres>, keyword: &str) {
        if self.predicates.is_empty() {
            return;
        }
        qb.push(keyword);
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            predicate.push_sql(qb);
        }
    }
}

impl From<Predicate> for Filter {
    fn from(predicate: Predicate) -> Self {
        Filter::new().and(predicate)
    }
}

impl FromIterator<Predicate> for Filter {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}
