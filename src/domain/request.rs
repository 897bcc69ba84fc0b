//! The per-invocation render request and the value types it is built from.
//!
//! A request is constructed once from the invocation flags, consumed by the
//! render pipeline, and dropped. Nothing here touches the filesystem.

use std::{fmt, path::PathBuf};

use url::Url;

use super::error::DomainError;

/// Extension given to serialized diagram sources.
pub const UML_EXTENSION: &str = "uml";
/// Extension of rendered diagrams.
pub const SVG_EXTENSION: &str = "svg";

/// Base name under which the `.uml` and `.svg` files are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramName(String);

impl DiagramName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("diagram name is empty"));
        }
        if trimmed == "." || trimmed == ".." {
            return Err(DomainError::validation(format!(
                "diagram name `{trimmed}` is not a file name"
            )));
        }
        if trimmed.contains(['/', '\\']) {
            return Err(DomainError::validation(format!(
                "diagram name `{trimmed}` must not contain a path separator"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagramName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reference to a diagram source that lives outside the invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A file on the local filesystem; never removed by the pipeline.
    Local(PathBuf),
    /// A network resource that has to be fetched before rendering.
    Remote(Url),
}

impl Location {
    /// Classify a path or URL.
    ///
    /// No scheme, a `file` scheme, or a single-letter scheme (a Windows drive
    /// prefix) is local; any other scheme is remote.
    ///
    /// `file:` URLs follow URL resolution, so `file:relative.uml` names
    /// `/relative.uml`. Pass a plain path for a file relative to the cwd.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::validation("source location is empty"));
        }

        match Url::parse(raw) {
            Ok(url) if url.scheme() == "file" => {
                url.to_file_path().map(Self::Local).map_err(|()| {
                    DomainError::validation(format!("`{raw}` is not a usable file URL"))
                })
            }
            Ok(url) if url.scheme().len() == 1 => Ok(Self::Local(PathBuf::from(raw))),
            Ok(url) => Ok(Self::Remote(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::Local(PathBuf::from(raw))),
            Err(err) => Err(DomainError::validation(format!(
                "invalid source location `{raw}`: {err}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramSource {
    /// Diagram text supplied with the invocation.
    Inline(String),
    Location(Location),
}

impl DiagramSource {
    /// Build a source from the `--file` flag state and the cell text.
    ///
    /// `None` means the flag was absent and the text is the diagram itself.
    /// `Some(None)` means a bare `--file`, which takes the first token of the
    /// text as the location.
    pub fn from_invocation(file: Option<Option<&str>>, text: &str) -> Result<Self, DomainError> {
        match file {
            None => Ok(Self::Inline(text.to_string())),
            Some(Some(location)) => Location::parse(location).map(Self::Location),
            Some(None) => {
                let first = text.split_whitespace().next().ok_or_else(|| {
                    DomainError::validation("--file given without a location and input is empty")
                })?;
                Location::parse(first).map(Self::Location)
            }
        }
    }
}

/// Which renderer back end produces the SVG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// The PlantUML web service, reached through its command-line client.
    Web,
    /// A local `plantuml.jar` run under java; the path is absolute.
    Jar { jar: PathBuf },
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub source: DiagramSource,
    pub name: Option<DiagramName>,
    pub backend: Backend,
    /// Directory that receives serialized sources and rendered SVGs.
    pub work_dir: PathBuf,
}

impl RenderRequest {
    /// Whether outputs outlive the invocation.
    pub fn persists(&self) -> bool {
        self.name.is_some()
    }
}
