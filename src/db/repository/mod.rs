//! Repository layer: table-scoped database operations.
//!
//! One sub-module per table. Functions take a borrowed `Connection` and
//! never open transactions of their own; callers sequence the writes.

mod diagnosis;
mod expert;
mod reservation;
mod user;

pub use diagnosis::*;
pub use expert::*;
pub use reservation::*;
pub use user::*;
