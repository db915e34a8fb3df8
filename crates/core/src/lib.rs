//! Domain types, error taxonomy and pure helpers shared by the FitStudio
//! crates.
//!
//! This crate has no database or HTTP dependencies so it can be used from
//! the repository layer, the API server and tests alike.

pub mod booking;
pub mod error;
pub mod pagination;
pub mod timezone;
pub mod types;
pub mod validation;
