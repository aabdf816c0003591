mod cli;
mod commands;
mod config;
mod effects;
mod logging;
mod render;
mod session;

use clap::Parser;
use pks_core::CaptureSource;

use crate::logging::LogDestination;
use crate::session::Session;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::initialize(if cli.verbose {
        LogDestination::Both
    } else {
        LogDestination::File
    });

    let engine_config = config::engine_config(cli.backend_url.as_deref());
    let mut session = Session::new(engine_config)?;

    match cli.command {
        cli::Command::Capture {
            url,
            extract,
            title,
        } => {
            let source = if extract {
                CaptureSource::Page { url }
            } else {
                CaptureSource::Url { url }
            };
            commands::capture(&mut session, source, title)
        }
        cli::Command::CaptureText { file, url, title } => {
            let text = commands::read_text(file.as_deref())?;
            commands::capture(&mut session, CaptureSource::Text { text, url }, title)
        }
        cli::Command::Chat => commands::chat(&mut session),
        cli::Command::Documents { action } => match action {
            cli::DocumentsAction::List => commands::list_documents(&mut session),
            cli::DocumentsAction::Delete { id } => commands::delete_document(&mut session, id),
        },
        cli::Command::Health => commands::health(&mut session),
    }
}
