use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use anyhow::{bail, Context};
use client_logging::client_warn;
use pks_core::{AppViewModel, CaptureSource, Msg, StatusSeverity};

use crate::render;
use crate::session::Session;

pub fn capture(session: &mut Session, source: CaptureSource, title: String) -> anyhow::Result<()> {
    let first = session.dispatch(Msg::CaptureRequested { source, title });
    if let Some(view) = first {
        if let Some(status) = &view.capture_status {
            render::print_status(status);
        }
        // A validation rejection is terminal before any effect runs.
        if capture_finished(&view) {
            return capture_outcome(&view);
        }
    }

    loop {
        if let Some(view) = session.pump()? {
            if let Some(status) = &view.capture_status {
                render::print_status(status);
            }
            if capture_finished(&view) {
                return capture_outcome(&view);
            }
        }
    }
}

fn capture_finished(view: &AppViewModel) -> bool {
    !view.capture_pending
        && view
            .capture_status
            .as_ref()
            .is_some_and(|status| status.severity != StatusSeverity::Pending)
}

fn capture_outcome(view: &AppViewModel) -> anyhow::Result<()> {
    match view.capture_status.as_ref() {
        // The status line was already printed; just exit non-zero.
        Some(status) if status.severity == StatusSeverity::Error => bail!("capture failed"),
        _ => Ok(()),
    }
}

pub fn chat(session: &mut Session) -> anyhow::Result<()> {
    println!("Ask a question about your knowledge base (Ctrl-D to quit).");
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF ends the conversation.
            println!();
            return Ok(());
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        session.dispatch(Msg::QueryInputChanged(query.to_string()));
        if session.dispatch(Msg::QuerySubmitted).is_none() {
            // The submission guard rejected it; nothing is in flight.
            continue;
        }

        let view = session.wait_for(|view| !view.chat_pending)?;
        if let Some(turn) = view.transcript.last() {
            render::print_turn(turn);
        }
        if let Some(error) = &view.chat_error {
            client_warn!("chat submission failed: {error}");
        }
    }
}

pub fn list_documents(session: &mut Session) -> anyhow::Result<()> {
    session.dispatch(Msg::DocumentsRequested);
    let view = session.wait_for(|view| !view.documents_pending)?;
    if let Some(error) = &view.documents_error {
        bail!("{error}");
    }
    render::print_documents(&view.documents);
    Ok(())
}

pub fn delete_document(session: &mut Session, id: String) -> anyhow::Result<()> {
    session.dispatch(Msg::DocumentDeleteRequested { id });
    let view = session.wait_for(|view| !view.documents_pending)?;
    if let Some(error) = &view.documents_error {
        bail!("{error}");
    }
    if let Some(notice) = &view.notice {
        println!("{notice}");
    }
    Ok(())
}

pub fn health(session: &mut Session) -> anyhow::Result<()> {
    session.dispatch(Msg::HealthRequested);
    let view = session.wait_for(|view| !view.health_pending)?;
    if let Some(error) = &view.health_error {
        bail!("backend unreachable or unhealthy: {error}");
    }
    match &view.health {
        Some(health) => render::print_health(health),
        None => bail!("backend returned no health information"),
    }
    Ok(())
}

pub fn read_text(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
