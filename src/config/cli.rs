use std::path::PathBuf;

use clap::{Args, Parser, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the plantsvg binary.
///
/// The diagram source is read from stdin unless `--file` carries a location.
#[derive(Debug, Parser)]
#[command(
    name = "plantsvg",
    version,
    about = "Render a PlantUML diagram to inline SVG"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "PLANTSVG_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Render using the specified path or URL; without a value, the first token of stdin is used.
    #[arg(short = 'f', long = "file", value_name = "LOCATION")]
    pub file: Option<Option<String>>,

    /// Render using plantuml.jar (default is the web service).
    #[arg(short = 'j', long = "jar", action = clap::ArgAction::SetTrue)]
    pub jar: bool,

    /// Persist as <NAME>.uml and <NAME>.svg after rendering.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Specify the PlantUML jar path; implies --jar.
    #[arg(
        short = 'p',
        long = "plantuml-path",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub plantuml_path: Option<PathBuf>,

    /// Directory for source and output files (defaults to the current directory).
    #[arg(long = "work-dir", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub work_dir: Option<PathBuf>,

    #[command(flatten)]
    pub render: RenderOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}

impl CliArgs {
    /// Whether the invocation asked for the local jar renderer.
    pub fn wants_jar(&self) -> bool {
        self.jar || self.plantuml_path.is_some()
    }
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Override the java executable used by the jar renderer.
    #[arg(long = "java-path", value_name = "PATH")]
    pub java_path: Option<PathBuf>,

    /// Override the PlantUML web service client executable.
    #[arg(long = "web-cli-path", value_name = "PATH")]
    pub web_cli_path: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}
