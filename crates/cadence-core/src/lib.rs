//! # Cadence Core Library
//!
//! The scheduling engine behind the Cadence planner: actions carry a date
//! range and an optional recurrence pattern, and every write expands them into
//! concrete per-date occurrences that calendar views read back.
//!
//! ## Features
//!
//! - **Recurrence Expansion**: daily, weekly, monthly, yearly and
//!   weekday-set patterns with an explicit month-end clamp
//! - **Eager Materialization**: occurrences are regenerated inside the same
//!   transaction as the action write, keeping notes on surviving dates
//! - **Exceptions**: individual dates can be skipped, moved or cancelled
//! - **Calendar Range Queries**: per-day groups with duplicate and orphan
//!   tolerance
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`repository`]: Data access layer with Repository pattern
//! - [`recurrence`]: Pattern expansion and materialization planning
//! - [`calendar`]: Day grouping and event assembly for calendar views
//! - [`error`]: Error types shared by every layer
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cadence_core::{
//!     db, error::CoreError, models::NewActionData,
//!     recurrence::{MaterializationConfig, MaterializationManager, RecurrencePattern},
//!     repository::{ActionRepository, CalendarRepository, SqliteRepository},
//! };
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CoreError> {
//!     let pool = db::establish_connection("cadence.db").await?;
//!     let manager = MaterializationManager::new(MaterializationConfig::default());
//!     let repo = SqliteRepository::new(pool, manager);
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
//!     repo.add_action(NewActionData {
//!         text: "Long run".to_string(),
//!         is_date_range: true,
//!         start_date: Some(start),
//!         end_date: Some(end),
//!         recurrence_pattern: Some(RecurrencePattern::Weekly),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//!     for day in repo.query_range(start, end).await? {
//!         println!("{}: {} event(s)", day.date, day.events.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod calendar;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
