//! Terminal rendering of tracker state. Everything here returns strings so the session loop
//! decides where output goes.

pub mod dashboard;
pub mod week_grid;
