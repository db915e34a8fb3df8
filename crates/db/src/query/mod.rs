//! Typed, dynamically composed data access.
//!
//! - [`predicate`] defines the closed set of filter predicates and the
//!   AND-combining [`Filter`].
//! - [`composer`] builds lazy read queries with a fixed clause order.

pub mod composer;
pub mod predicate;

pub use composer::{
    Aggregate, ComposedQuery, Direction, Entity, HavingPredicate, Join, JoinKind, OrderBy,
    QueryComposer, SelectQuery,
};
pub use predicate::{Column, Comparison, Filter, Predicate, Value};
