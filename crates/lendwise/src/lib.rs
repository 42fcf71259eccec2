//! Underwriting decisioning for the consumer lending platform.
//!
//! The decision engine lives under [`workflows::underwriting`]; the remaining modules carry the
//! configuration, telemetry, and error plumbing shared with the API host.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
