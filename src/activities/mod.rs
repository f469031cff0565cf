//! Activity tracking core.
//!
//!  - [store::ActivityStore] owns the current [store::ActivityState] and changes it only through
//!    [command::ActivityCommand]s.
//!  - [projections] derive what the user sees (today's count, per-day lookups) without touching
//!    the state.
//!  - [factory::CommandFactory] builds complete commands from user intents.
//!  - [week::WeekGrid] lays completions out over a Monday-start week.

pub mod command;
pub mod entities;
pub mod error;
pub mod factory;
pub mod projections;
pub mod seed;
pub mod store;
pub mod week;
