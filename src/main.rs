use std::process;

use plantsvg::{
    application::{error::AppError, invocation, render::DiagramRenderer},
    config,
    infra::telemetry,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let cell_text = if invocation::needs_cell_text(&cli_args) {
        read_stdin().await?
    } else {
        String::new()
    };

    let request = invocation::build_request(&cli_args, &settings.render, &cell_text)?;
    let renderer = DiagramRenderer::new(settings.render)?;
    let rendered = renderer.render(&request).await?;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(rendered.markup.as_bytes())
        .await
        .map_err(AppError::Output)?;
    stdout.flush().await.map_err(AppError::Output)
}

async fn read_stdin() -> Result<String, AppError> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(AppError::Input)?;
    Ok(text)
}
