//! Derived metrics and notification deduplication for a team project board.
//!
//! Entity collections live in [`model::Board`]. [`analyze`] computes team and
//! member statistics and cross-team dependency views from them without side
//! effects. [`notify`] keeps the notification list and raises at most one
//! notification per condition and related entity, either on demand or from a
//! periodic scheduler.

pub mod analyze;
pub mod model;
pub mod notify;
pub mod report;
