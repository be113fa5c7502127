use anyhow::Result;
use serde_json::json;

use pagesync::{CanvasPoint, DocumentPoint, Settings};

use super::output;

/// Canvas point → page-native point, page auto-detected.
pub fn cmd_to_document(settings: &Settings, x: f64, y: f64) -> Result<()> {
    let layout = super::load_layout(settings)?;
    let canvas = CanvasPoint::new(x, y);
    let (page, clamped) = layout.locate(y);
    let document = page.to_native(canvas);

    if clamped {
        eprintln!(
            "⚠️  y={y} is outside every page; using last page {}",
            document.page
        );
    }
    eprintln!(
        "📍 canvas ({x}, {y}) → page {} ({:.3}, {:.3})",
        document.page, document.x, document.y
    );

    output::emit(&json!({
        "command": "to-document",
        "canvas": canvas,
        "document": document,
        "clamped": clamped,
    }));

    Ok(())
}

/// Page-native point → canvas point.
pub fn cmd_to_canvas(settings: &Settings, page: u32, x: f64, y: f64) -> Result<()> {
    let layout = super::load_layout(settings)?;
    let document = DocumentPoint::new(page, x, y);
    let canvas = layout.document_to_canvas(document)?;

    eprintln!(
        "📍 page {page} ({x}, {y}) → canvas ({:.3}, {:.3})",
        canvas.x, canvas.y
    );

    output::emit(&json!({
        "command": "to-canvas",
        "document": document,
        "canvas": canvas,
    }));

    Ok(())
}
