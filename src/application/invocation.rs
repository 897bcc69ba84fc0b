//! Translation of command-line flags into a [`RenderRequest`].

use std::path::Path;

use crate::{
    application::render::RenderError,
    config::{CliArgs, RenderSettings},
    domain::request::{Backend, DiagramName, DiagramSource, RenderRequest},
};

/// Whether the diagram text has to be read before the request can be built.
///
/// Only `--file <LOCATION>` makes the text unnecessary.
pub fn needs_cell_text(cli: &CliArgs) -> bool {
    !matches!(cli.file, Some(Some(_)))
}

/// Pick the renderer: the jar when asked for explicitly, the web service otherwise.
pub fn select_backend(use_jar: bool, jar: &Path) -> Result<Backend, RenderError> {
    if !use_jar {
        return Ok(Backend::Web);
    }
    let jar = std::path::absolute(jar).map_err(|source| RenderError::JarPath {
        path: jar.to_path_buf(),
        source,
    })?;
    Ok(Backend::Jar { jar })
}

pub fn build_request(
    cli: &CliArgs,
    render: &RenderSettings,
    cell_text: &str,
) -> Result<RenderRequest, RenderError> {
    let source = DiagramSource::from_invocation(
        cli.file.as_ref().map(|location| location.as_deref()),
        cell_text,
    )?;
    let name = cli.name.as_deref().map(DiagramName::parse).transpose()?;
    let backend = select_backend(cli.wants_jar(), &render.plantuml_jar)?;
    let work_dir = match cli.work_dir.as_ref() {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(RenderError::WorkDir)?,
    };

    Ok(RenderRequest {
        source,
        name,
        backend,
        work_dir,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::domain::request::Location;

    fn cli(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("plantsvg").chain(args.iter().copied()))
    }

    fn render_settings(jar: &str) -> RenderSettings {
        RenderSettings {
            plantuml_jar: PathBuf::from(jar),
            java_path: PathBuf::from("java"),
            web_cli_path: PathBuf::from("plantweb"),
        }
    }

    #[test]
    fn omitting_jar_flags_routes_to_web() {
        let request = build_request(
            &cli(&["--work-dir", "/tmp"]),
            &render_settings("/usr/local/bin/plantuml.jar"),
            "@startuml\n@enduml\n",
        )
        .expect("request");
        assert_eq!(request.backend, Backend::Web);
        assert!(!request.persists());
    }

    #[test]
    fn jar_flag_routes_to_jar_with_absolute_path() {
        let request = build_request(
            &cli(&["-j", "--work-dir", "/tmp"]),
            &render_settings("tools/plantuml.jar"),
            "@startuml\n@enduml\n",
        )
        .expect("request");
        match request.backend {
            Backend::Jar { jar } => {
                assert!(jar.is_absolute());
                assert!(jar.ends_with("tools/plantuml.jar"));
            }
            other => panic!("expected jar backend, got {other:?}"),
        }
    }

    #[test]
    fn explicit_jar_path_routes_to_jar() {
        assert_eq!(
            select_backend(true, Path::new("/opt/plantuml.jar")).expect("backend"),
            Backend::Jar {
                jar: PathBuf::from("/opt/plantuml.jar")
            }
        );
        assert_eq!(
            select_backend(false, Path::new("/opt/plantuml.jar")).expect("backend"),
            Backend::Web
        );
    }

    #[test]
    fn name_and_location_flow_into_request() {
        let request = build_request(
            &cli(&["-f", "https://example.com/seq.uml", "-n", "seq", "--work-dir", "/tmp"]),
            &render_settings("/usr/local/bin/plantuml.jar"),
            "",
        )
        .expect("request");
        assert!(request.persists());
        assert_eq!(request.name.as_ref().map(DiagramName::as_str), Some("seq"));
        assert!(matches!(
            request.source,
            DiagramSource::Location(Location::Remote(_))
        ));
        assert_eq!(request.work_dir, PathBuf::from("/tmp"));
    }

    #[test]
    fn invalid_name_is_rejected() {
        let err = build_request(
            &cli(&["-n", "../escape"]),
            &render_settings("/usr/local/bin/plantuml.jar"),
            "@startuml\n@enduml\n",
        )
        .expect_err("bad name");
        assert!(matches!(err, RenderError::Request(_)));
    }

    #[test]
    fn cell_text_is_only_needed_without_explicit_location() {
        assert!(needs_cell_text(&cli(&[])));
        assert!(needs_cell_text(&cli(&["-f"])));
        assert!(!needs_cell_text(&cli(&["-f", "seq.uml"])));
    }
}
