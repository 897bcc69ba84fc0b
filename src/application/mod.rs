//! Application services: turning an invocation into a rendered diagram.

pub mod cleanup;
pub mod error;
pub mod invocation;
pub mod render;
