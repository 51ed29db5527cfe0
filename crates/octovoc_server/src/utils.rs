//! Generic utilities.

pub mod diesel;
