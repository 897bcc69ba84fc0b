//! The render pipeline: resolve the source, run a back end, collect the SVG.

use std::{
    io,
    path::{Path, PathBuf},
    time::Instant,
};

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    application::cleanup::TransientFiles,
    config::RenderSettings,
    domain::{
        error::DomainError,
        request::{Backend, DiagramSource, Location, RenderRequest, UML_EXTENSION},
    },
    infra::{
        fetch::{FetchError, SourceFetcher},
        plantuml::{BackendError, JarRenderer, RenderBackend, WebRenderer, svg_path_for},
    },
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Request(#[from] DomainError),
    #[error("failed to resolve working directory: {0}")]
    WorkDir(io::Error),
    #[error("failed to resolve PlantUML jar path {}: {source}", path.display())]
    JarPath { path: PathBuf, source: io::Error },
    #[error("diagram source {} does not exist", path.display())]
    MissingSource { path: PathBuf },
    #[error("diagram source {} is not a file", path.display())]
    NotAFile { path: PathBuf },
    #[error("failed to write diagram source {}: {source}", path.display())]
    WriteSource { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to clear previous SVG {}: {source}", path.display())]
    ClearOutput { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("failed to read rendered SVG {}: {source}", path.display())]
    ReadSvg { path: PathBuf, source: io::Error },
}

/// A rendered diagram, read into memory before transient files are removed.
#[derive(Debug, Clone)]
pub struct RenderedSvg {
    pub path: PathBuf,
    pub markup: String,
    /// Whether `path` still exists once the render call has returned.
    pub persisted: bool,
}

pub struct DiagramRenderer {
    settings: RenderSettings,
    fetcher: SourceFetcher,
}

impl DiagramRenderer {
    pub fn new(settings: RenderSettings) -> Result<Self, RenderError> {
        let fetcher = SourceFetcher::new()?;
        Ok(Self { settings, fetcher })
    }

    fn backend_for(&self, backend: &Backend) -> Box<dyn RenderBackend> {
        match backend {
            Backend::Web => Box::new(WebRenderer::new(self.settings.web_cli_path.clone())),
            Backend::Jar { jar } => Box::new(JarRenderer::new(
                self.settings.java_path.clone(),
                jar.clone(),
            )),
        }
    }

    /// Render one request.
    ///
    /// Unless the request is named, the serialized or fetched source and the
    /// SVG are removed before this returns, on success and on failure alike.
    /// A local source file is never removed.
    pub async fn render(&self, request: &RenderRequest) -> Result<RenderedSvg, RenderError> {
        let started_at = Instant::now();
        let work_dir = std::path::absolute(&request.work_dir).map_err(RenderError::WorkDir)?;
        let persist = request.persists();
        let base_name = match request.name.as_ref() {
            Some(name) => name.as_str().to_string(),
            None => Uuid::new_v4().to_string(),
        };
        let mut transient = TransientFiles::new();

        let uml_path = match &request.source {
            DiagramSource::Inline(text) => {
                let path = source_path(&work_dir, &base_name);
                if !persist {
                    transient.track(&path);
                }
                tokio::fs::write(&path, text)
                    .await
                    .map_err(|source| RenderError::WriteSource {
                        path: path.clone(),
                        source,
                    })?;
                path
            }
            DiagramSource::Location(Location::Local(path)) => {
                if !path.exists() {
                    return Err(RenderError::MissingSource { path: path.clone() });
                }
                if !path.is_file() {
                    return Err(RenderError::NotAFile { path: path.clone() });
                }
                path.clone()
            }
            DiagramSource::Location(Location::Remote(url)) => {
                let path = source_path(&work_dir, &base_name);
                if !persist {
                    transient.track(&path);
                }
                self.fetcher.fetch_to(url, &path).await?;
                path
            }
        };

        let backend = self.backend_for(&request.backend);
        let svg_path = svg_path_for(&uml_path, &work_dir);
        // A local source already named `*.svg` renders onto itself; leave it alone.
        let renders_onto_source =
            std::path::absolute(&uml_path).is_ok_and(|source| source == svg_path);
        if !renders_onto_source {
            if !persist {
                transient.track(&svg_path);
            }
            // A leftover SVG must not pass for this run's output.
            match tokio::fs::remove_file(&svg_path).await {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(RenderError::ClearOutput {
                        path: svg_path,
                        source,
                    });
                }
            }
        }

        let outputs = backend
            .render(std::slice::from_ref(&uml_path), &work_dir)
            .inspect_err(|err| {
                warn!(
                    target = "application::render",
                    op = "render::diagram",
                    backend = backend.name(),
                    result = "error",
                    elapsed_ms = started_at.elapsed().as_millis() as u64,
                    error = %err,
                    "Diagram render failed"
                );
            })?;
        let svg_path = outputs.into_iter().next().unwrap_or(svg_path);

        let markup = tokio::fs::read_to_string(&svg_path)
            .await
            .map_err(|source| RenderError::ReadSvg {
                path: svg_path.clone(),
                source,
            })?;

        info!(
            target = "application::render",
            op = "render::diagram",
            backend = backend.name(),
            result = "ok",
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            svg_path = %svg_path.display(),
            svg_bytes = markup.len(),
            persisted = persist,
            "Diagram rendered"
        );

        Ok(RenderedSvg {
            path: svg_path,
            markup,
            persisted: persist,
        })
    }
}

fn source_path(work_dir: &Path, base_name: &str) -> PathBuf {
    work_dir.join(format!("{base_name}.{UML_EXTENSION}"))
}
