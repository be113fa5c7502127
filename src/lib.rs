//! `pagesync` - canvas ⇄ page ⇄ source coordinate mapping
//!
//! # Features
//!
//! - **Page geometry**: native page sizes read from SVG / PostScript headers
//! - **Canvas layout**: pages scaled to one width and stacked with fixed spacing
//! - **Coordinate mapping**: canvas points to page-native points and back
//! - **Source sync**: `synctex` lookups from canvas points and to canvas points
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pagesync::{resolve_layout, CanvasPoint, LayoutOptions, PageSource, SyncBridge, SynctexCli};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let layout = resolve_layout(&PageSource::new("build/pages"), LayoutOptions::default())?;
//!     let oracle = SynctexCli::new();
//!     let bridge = SyncBridge::new(&layout, &oracle, Path::new("build/paper.pdf"));
//!
//!     let lookup = bridge.source_at_canvas(CanvasPoint::new(120.0, 1400.0)).await?;
//!     if let Some(location) = lookup.outcome.found() {
//!         println!("{}:{}", location.input.display(), location.line);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod mapper;
pub mod synctex;

pub use config::Settings;
pub use error::{Result, SyncError};
pub use geometry::{
    resolve_layout, GeometrySource, LayoutOptions, PageGeometry, PageLayout, PageSource, PageSpec,
};
pub use mapper::{CanvasPoint, DocumentPoint};
pub use synctex::{
    CanvasHit, DocumentHit, SourceLocation, SourceLookup, SourceQuery, SyncBridge, SyncOracle,
    SyncOutcome, SynctexCli,
};
