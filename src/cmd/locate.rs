use std::path::Path;

use anyhow::Result;
use serde_json::json;

use pagesync::{Settings, SourceQuery, SyncBridge, SyncOutcome};

use super::output;

/// Canvas positions for a source line.
pub async fn cmd_locate(
    settings: &Settings,
    document: &Path,
    input: &Path,
    line: u32,
    column: u32,
) -> Result<()> {
    let layout = super::load_layout(settings)?;
    let oracle = super::oracle(settings)?;
    let bridge = SyncBridge::new(&layout, &oracle, document);
    let query = SourceQuery::new(input, line).with_column(column);

    eprintln!("🔎 {}:{line} in {}", input.display(), document.display());

    let mut payload = json!({
        "command": "locate",
        "query": {
            "input": query.input,
            "line": query.line,
            "column": query.column,
        },
    });

    match bridge.canvas_for_source(&query).await? {
        SyncOutcome::Found(hits) => {
            for hit in &hits {
                match hit.canvas {
                    Some(canvas) => eprintln!(
                        "✅ page {} ({:.3}, {:.3}) → canvas ({:.3}, {:.3})",
                        hit.document.point.page,
                        hit.document.point.x,
                        hit.document.point.y,
                        canvas.x,
                        canvas.y
                    ),
                    None => eprintln!(
                        "⚠️  page {} is not in the page layout",
                        hit.document.point.page
                    ),
                }
            }
            payload["found"] = json!(true);
            payload["hits"] = json!(hits);
        }
        SyncOutcome::NotFound { raw } => {
            eprintln!("❌ No document position for this line");
            payload["found"] = json!(false);
            payload["hits"] = json!([]);
            payload["raw"] = json!(raw.trim());
        }
    }

    output::emit(&payload);
    Ok(())
}
