//! Render PlantUML diagrams to SVG through a local `plantuml.jar` or the
//! PlantUML web service, keeping or discarding the intermediate files.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
