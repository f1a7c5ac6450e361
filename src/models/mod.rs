//! Database models and DTOs.

pub mod dashboard;
pub mod user;
