//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! a `&PgPool` (or any `PgExecutor`) as the first argument. Reads are
//! composed with [`QueryComposer`](crate::query::QueryComposer), bulk writes
//! go through [`MutationExecutor`](crate::mutation::MutationExecutor).

pub mod booking_repo;
pub mod fitness_class_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use fitness_class_repo::FitnessClassRepo;
pub use user_repo::UserRepo;
