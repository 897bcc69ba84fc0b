//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod fetch;
pub mod plantuml;
pub mod telemetry;
