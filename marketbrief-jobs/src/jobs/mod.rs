//! Job entry points, one per scheduled script.
//!
//! Jobs absorb data faults internally (a dead source degrades to absent
//! values) and only surface filesystem errors to the caller.

pub mod brief;
pub mod etf;
pub mod news;
pub mod snapshot;
