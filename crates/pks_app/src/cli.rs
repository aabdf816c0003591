use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "pks",
    version,
    about = "Capture web pages into a personal knowledge base and chat with it"
)]
pub struct Cli {
    /// Base URL of the knowledge-base backend. Falls back to the
    /// PKS_BACKEND_URL environment variable, then to the built-in default.
    #[arg(long, global = true)]
    pub backend_url: Option<String>,
    /// Mirror the log to the terminal in addition to ./pks.log.
    #[arg(long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save a web page into the knowledge base.
    Capture {
        /// Page URL to save.
        url: String,
        /// Fetch the page locally and send its extracted text instead of
        /// the bare URL.
        #[arg(long)]
        extract: bool,
        /// Title stored with the document. In --extract mode the page title
        /// is used when this is empty.
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Save raw text from a file or stdin.
    CaptureText {
        /// Read text from this file; stdin when omitted.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Source URL stored with the text.
        #[arg(long)]
        url: Option<String>,
        /// Title stored with the document.
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Ask questions against the knowledge base (interactive).
    Chat,
    /// Inspect stored documents.
    Documents {
        #[command(subcommand)]
        action: DocumentsAction,
    },
    /// Check backend health.
    Health,
}

#[derive(Debug, Subcommand)]
pub enum DocumentsAction {
    /// List every stored document.
    List,
    /// Delete a document and all of its chunks.
    Delete { id: String },
}
