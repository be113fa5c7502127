use std::path::Path;

use anyhow::Result;
use serde_json::json;

use pagesync::{CanvasPoint, DocumentPoint, Settings, SyncBridge, SyncOutcome};

use super::output;

/// Source location for a point.
///
/// With `page`, `x`/`y` are page-native; otherwise they are canvas
/// coordinates and the page is auto-detected.
pub async fn cmd_source(
    settings: &Settings,
    document: &Path,
    page: Option<u32>,
    x: f64,
    y: f64,
) -> Result<()> {
    let layout = super::load_layout(settings)?;
    let oracle = super::oracle(settings)?;
    let bridge = SyncBridge::new(&layout, &oracle, document);

    let lookup = match page {
        Some(page) => bridge.source_at_document(DocumentPoint::new(page, x, y)).await?,
        None => bridge.source_at_canvas(CanvasPoint::new(x, y)).await?,
    };
    let canvas = layout.document_to_canvas(lookup.document)?;

    if lookup.clamped {
        eprintln!(
            "⚠️  y={y} is outside every page; using last page {}",
            lookup.document.page
        );
    }
    eprintln!(
        "🔎 page {} ({:.3}, {:.3}) in {}",
        lookup.document.page,
        lookup.document.x,
        lookup.document.y,
        document.display()
    );

    let mut payload = json!({
        "command": "source",
        "document": lookup.document,
        "canvas": canvas,
        "clamped": lookup.clamped,
    });

    match lookup.outcome {
        SyncOutcome::Found(location) => {
            eprintln!("✅ {}:{}", location.input.display(), location.line);
            payload["found"] = json!(true);
            payload["source"] = json!(location);
        }
        SyncOutcome::NotFound { raw } => {
            eprintln!("❌ No source line for this position");
            payload["found"] = json!(false);
            payload["raw"] = json!(raw.trim());
        }
    }

    output::emit(&payload);
    Ok(())
}
