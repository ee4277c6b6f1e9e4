//! Interview evaluation workflows for the HR administrative console.
//!
//! The library owns the rubric configuration, the score aggregator shared by every
//! presentation surface, and the interview record lifecycle. The `hr-console-api`
//! service wires these into HTTP routes and a command line.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
