pub mod booking;
pub mod fitness_class;
pub mod report;
pub mod user;
