// src/attendance/mod.rs
//
// Replaying the captured credentials against the private API and joining the
// answers into one attendance table.
pub mod aggregate;
pub mod api;
pub mod model;

pub use aggregate::{past_sessions, run, Attendance};
pub use api::{AttendanceApi, FetchError, HttpApi};
pub use model::{Meeting, Outcome, Session, SessionInfo, Student, StudentOutcome};
