//! Community energy strategy planner.
//!
//! A step wizard that collects community, EV and comfort parameters,
//! projects cost, peak and emission figures for two load-shaping strategies
//! against a baseline, compares synthetic load curves, and runs simulated
//! community-vote and demand-response flows.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
/// Vote, DR, toast, storage and clipboard flows.
pub mod flows;
pub mod io;
pub mod model;
pub mod telemetry;
pub mod wizard;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "tui")]
pub mod tui;
