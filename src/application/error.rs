use std::io;

use thiserror::Error;

use crate::{application::render::RenderError, config::LoadError, infra::error::InfraError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to read diagram source from stdin: {0}")]
    Input(io::Error),
    #[error("failed to write SVG to stdout: {0}")]
    Output(io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}
