//! Pure business rules, kept out of the request handlers so they are
//! testable without a database.

pub mod attendance;
pub mod leave;
pub mod scope;
pub mod task;
