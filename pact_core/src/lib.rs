#![forbid(unsafe_code)]

//! Core domain model and rules engine for the Pact accountability system.
//!
//! This crate provides:
//! - Domain types (modes, groups, exercises, log entries)
//! - Target calculation, point scoring and recovery capping
//! - Streak measurement and automatic mode promotion
//! - Exercise catalog
//! - Local persistence adapters (journal, member state, CSV report)

pub mod types;
pub mod error;
pub mod target;
pub mod scoring;
pub mod streak;
pub mod engine;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod journal;
pub mod state;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use target::{compute_daily_target, CurveParams, TargetCurve};
pub use scoring::{effective_recovery_points, score_entry, score_entry_raw};
pub use streak::{compute_insane_streak, compute_streak, should_promote};
pub use engine::{daily_status, record_entry, DailyStatus, MemberContext, RecordOutcome};
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use journal::{JsonlSink, LogSink};
pub use state::MemberState;
