use pks_core::{DocumentRow, HealthView, Role, StatusLine, StatusSeverity, TurnView};

pub fn print_status(line: &StatusLine) {
    let marker = match line.severity {
        StatusSeverity::Pending => "…",
        StatusSeverity::Success => "✓",
        StatusSeverity::Error => "✗",
    };
    println!("{marker} {}", line.text);
}

pub fn print_turn(turn: &TurnView) {
    match turn.role {
        Role::User => println!("you> {}", turn.content),
        Role::Assistant => println!("pks> {}", turn.content),
    }
    for (index, source) in turn.sources.iter().enumerate() {
        let title = if source.title.is_empty() {
            "Unknown source"
        } else {
            &source.title
        };
        if source.url.is_empty() {
            println!("  [{}] {} ({})", index + 1, title, source.source);
        } else {
            println!(
                "  [{}] {} ({}) {}",
                index + 1,
                title,
                source.source,
                source.url
            );
        }
    }
}

pub fn print_documents(documents: &[DocumentRow]) {
    if documents.is_empty() {
        println!("No documents stored yet.");
        return;
    }
    for doc in documents {
        let title = if doc.title.is_empty() {
            "(untitled)"
        } else {
            &doc.title
        };
        println!("{}  {}  [{}]", doc.id, title, doc.source);
        if !doc.url.is_empty() {
            println!("    {}", doc.url);
        }
        if !doc.timestamp.is_empty() {
            println!("    saved {}", doc.timestamp);
        }
    }
}

pub fn print_health(health: &HealthView) {
    println!("status:     {}", health.status);
    println!(
        "qdrant:     {}",
        if health.qdrant_connected {
            "connected"
        } else {
            "disconnected"
        }
    );
    if !health.collection_name.is_empty() {
        println!("collection: {}", health.collection_name);
    }
}
