//! Task reminder scheduling.
//!
//! # Responsibility
//! - Translate task remind times into one-shot alarm registrations.
//! - Keep the alarm facility in step with task completion and trash state.
//!
//! # See also
//! - `service::task_service` for the state transitions that drive it.

pub mod alarm;
pub mod scheduler;
