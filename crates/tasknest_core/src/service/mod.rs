//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Couple task state transitions to the reminder scheduler.
//! - Keep host layers decoupled from storage details.

pub mod category_service;
pub mod seed;
pub mod task_service;
