//! Event Attendance Fine Calculator.

mod calculator;
mod classify;

pub use calculator::{FineCalculator, MemberNames, member_names};
pub use classify::{EventKind, classify_event};
