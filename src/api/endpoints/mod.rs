//! HTTP endpoint handlers, one module per resource.
//!
//! Handlers parse and validate input, take the database lock for one
//! store operation, and return the resulting record as JSON.

pub mod diagnosis;
pub mod experts;
pub mod health;
pub mod reservations;
