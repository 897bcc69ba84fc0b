//! PlantUML renderer back ends.
//!
//! Both back ends shell out synchronously and derive the SVG path of every
//! input as `<work_dir>/<input stem>.svg`.

use std::{
    ffi::OsString,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::Instant,
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::request::SVG_EXTENSION;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no diagram sources were given to the {backend} renderer")]
    NoInputs { backend: &'static str },
    #[error("{backend} renderer unavailable ({}): {source}", program.display())]
    NotFound {
        backend: &'static str,
        program: PathBuf,
        source: io::Error,
    },
    #[error("failed to run the {backend} renderer: {source}")]
    Io {
        backend: &'static str,
        source: io::Error,
    },
    #[error("{backend} renderer invocation failed (exit {exit_code:?}): {stderr}")]
    Cli {
        backend: &'static str,
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("{backend} renderer did not produce {}", path.display())]
    MissingOutput {
        backend: &'static str,
        path: PathBuf,
    },
}

/// An external process that turns UML source files into SVG files.
pub trait RenderBackend: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Render every input and return the SVG paths in input order.
    fn render(&self, inputs: &[PathBuf], work_dir: &Path) -> Result<Vec<PathBuf>, BackendError>;
}

/// Renders through `java -jar plantuml.jar`.
#[derive(Debug, Clone)]
pub struct JarRenderer {
    java_path: PathBuf,
    jar_path: PathBuf,
}

impl JarRenderer {
    pub fn new(java_path: PathBuf, jar_path: PathBuf) -> Self {
        Self {
            java_path,
            jar_path,
        }
    }
}

impl RenderBackend for JarRenderer {
    fn name(&self) -> &'static str {
        "jar"
    }

    fn render(&self, inputs: &[PathBuf], work_dir: &Path) -> Result<Vec<PathBuf>, BackendError> {
        let backend = self.name();
        let work_dir = absolute(backend, work_dir)?;
        let mut command = Command::new(&self.java_path);
        command
            .arg("-splash:no")
            .arg("-jar")
            .arg(&self.jar_path)
            .arg("-tsvg")
            .arg("-o")
            .arg(&work_dir);
        run(backend, &self.java_path, command, inputs, &work_dir)
    }
}

/// Renders through the PlantUML web service client.
#[derive(Debug, Clone)]
pub struct WebRenderer {
    cli_path: PathBuf,
}

impl WebRenderer {
    pub fn new(cli_path: PathBuf) -> Self {
        Self { cli_path }
    }
}

impl RenderBackend for WebRenderer {
    fn name(&self) -> &'static str {
        "web"
    }

    fn render(&self, inputs: &[PathBuf], work_dir: &Path) -> Result<Vec<PathBuf>, BackendError> {
        let backend = self.name();
        let work_dir = absolute(backend, work_dir)?;
        let mut command = Command::new(&self.cli_path);
        command.arg("--format").arg("auto");
        run(backend, &self.cli_path, command, inputs, &work_dir)
    }
}

/// `<work_dir>/<stem>.svg` for the given source file.
pub fn svg_path_for(input: &Path, work_dir: &Path) -> PathBuf {
    let mut file_name = OsString::from(input.file_stem().unwrap_or_default());
    file_name.push(".");
    file_name.push(SVG_EXTENSION);
    work_dir.join(file_name)
}

fn absolute(backend: &'static str, path: &Path) -> Result<PathBuf, BackendError> {
    std::path::absolute(path).map_err(|source| BackendError::Io { backend, source })
}

fn run(
    backend: &'static str,
    program: &Path,
    mut command: Command,
    inputs: &[PathBuf],
    work_dir: &Path,
) -> Result<Vec<PathBuf>, BackendError> {
    if inputs.is_empty() {
        return Err(BackendError::NoInputs { backend });
    }

    let inputs = inputs
        .iter()
        .map(|input| absolute(backend, input))
        .collect::<Result<Vec<_>, _>>()?;
    let outputs: Vec<PathBuf> = inputs
        .iter()
        .map(|input| svg_path_for(input, work_dir))
        .collect();

    let started_at = Instant::now();
    let output = command
        .args(&inputs)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|err| {
            warn!(
                target = "infra::plantuml",
                op = "plantuml::render",
                backend,
                result = "error",
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                error_code = "spawn_cli",
                program = %program.display(),
                error = %err,
                "Failed to spawn PlantUML renderer"
            );
            if err.kind() == ErrorKind::NotFound {
                BackendError::NotFound {
                    backend,
                    program: program.to_path_buf(),
                    source: err,
                }
            } else {
                BackendError::Io {
                    backend,
                    source: err,
                }
            }
        })?;

    if !output.stdout.is_empty() {
        debug!(
            target = "infra::plantuml",
            op = "plantuml::render",
            backend,
            stdout = %String::from_utf8_lossy(&output.stdout),
            "PlantUML renderer output"
        );
    }

    if !output.status.success() {
        let exit_code = output.status.code();
        let exit_code_value = exit_code.map(i64::from).unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        warn!(
            target = "infra::plantuml",
            op = "plantuml::render",
            backend,
            result = "error",
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            exit_code = exit_code_value,
            error_code = "plantuml_cli",
            stderr = %stderr,
            "PlantUML renderer invocation failed"
        );
        return Err(BackendError::Cli {
            backend,
            exit_code,
            stderr,
        });
    }

    if let Some(missing) = outputs.iter().find(|path| !path.is_file()) {
        warn!(
            target = "infra::plantuml",
            op = "plantuml::render",
            backend,
            result = "error",
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            error_code = "missing_output",
            path = %missing.display(),
            "PlantUML renderer exited cleanly without writing the SVG"
        );
        return Err(BackendError::MissingOutput {
            backend,
            path: missing.clone(),
        });
    }

    info!(
        target = "infra::plantuml",
        op = "plantuml::render",
        backend,
        result = "ok",
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        diagrams = outputs.len(),
        "PlantUML diagrams rendered"
    );

    Ok(outputs)
}
