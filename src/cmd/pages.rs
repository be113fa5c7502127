use anyhow::Result;
use serde_json::json;

use pagesync::{GeometrySource, Settings};

use super::output;

pub fn cmd_pages(settings: &Settings) -> Result<()> {
    let layout = super::load_layout(settings)?;
    let options = layout.options();

    eprintln!(
        "📄 {} pages from {}",
        layout.page_count(),
        settings.pages_dir.display()
    );
    for page in layout.pages() {
        let note = if page.source == GeometrySource::Default {
            " (default size)"
        } else {
            ""
        };
        eprintln!(
            "   {:>4}: {:.2}x{:.2} scale {:.4} canvas {:.2}..{:.2}{note}",
            page.page,
            page.native_width,
            page.native_height,
            page.scale,
            page.canvas_top,
            page.canvas_bottom,
        );
    }

    output::emit(&json!({
        "command": "pages",
        "page_count": layout.page_count(),
        "target_width": options.target_width,
        "spacing": options.spacing,
        "canvas_height": layout.canvas_height(),
        "pages": layout.pages(),
    }));

    Ok(())
}
