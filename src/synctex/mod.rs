//! Source synchronization through SyncTeX.
//!
//! The oracle correlates positions in the typeset document with lines of the
//! source that produced them. [`SyncBridge`] puts the canvas mapping in front
//! of it, so callers can work purely in canvas coordinates:
//!
//! - canvas point → page-native point → `synctex edit` → source file + line
//! - source file + line → `synctex view` → page-native points → canvas points
//!
//! A lookup that runs but matches nothing returns [`SyncOutcome::NotFound`];
//! only a failure to run the oracle is an error.

pub mod cli;
pub mod response;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::PageLayout;
use crate::mapper::{CanvasPoint, DocumentPoint};

pub use cli::SynctexCli;
pub use response::{DocumentHit, HitBox, SourceLocation};

/// Result of an oracle query that ran successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome<T> {
    Found(T),
    /// No source correlates with the query. `raw` is the oracle's output.
    NotFound { raw: String },
}

impl<T> SyncOutcome<T> {
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub fn found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SyncOutcome<U> {
        match self {
            Self::Found(value) => SyncOutcome::Found(f(value)),
            Self::NotFound { raw } => SyncOutcome::NotFound { raw },
        }
    }
}

/// A source position to look up in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    pub input: PathBuf,
    pub line: u32,
    /// 0 when unknown, as synctex expects.
    pub column: u32,
}

impl SourceQuery {
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            input: input.into(),
            line,
            column: 0,
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = column;
        self
    }
}

/// Trait for source-synchronization oracles.
///
/// Implementations take and return page-native coordinates; canvas
/// translation is done by [`SyncBridge`].
#[async_trait]
pub trait SyncOracle: Send + Sync {
    /// Document position → source location.
    async fn edit(&self, document: &Path, point: DocumentPoint)
        -> Result<SyncOutcome<SourceLocation>>;

    /// Source location → document positions.
    async fn view(&self, document: &Path, query: &SourceQuery)
        -> Result<SyncOutcome<Vec<DocumentHit>>>;
}

/// A source lookup together with the document point that was queried.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLookup {
    pub document: DocumentPoint,
    /// The canvas point fell outside every page and was attributed to the last page.
    pub clamped: bool,
    pub outcome: SyncOutcome<SourceLocation>,
}

/// An oracle hit placed back on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasHit {
    pub document: DocumentHit,
    /// `None` when the oracle reported a page outside the layout.
    pub canvas: Option<CanvasPoint>,
}

/// Canvas-coordinate front end for a [`SyncOracle`].
pub struct SyncBridge<'a> {
    layout: &'a PageLayout,
    oracle: &'a dyn SyncOracle,
    document: &'a Path,
}

impl<'a> SyncBridge<'a> {
    /// `document` is the typeset output the oracle is asked about (e.g. `paper.pdf`).
    #[must_use]
    pub fn new(layout: &'a PageLayout, oracle: &'a dyn SyncOracle, document: &'a Path) -> Self {
        Self {
            layout,
            oracle,
            document,
        }
    }

    /// Source location under a canvas point; the page is auto-detected.
    pub async fn source_at_canvas(&self, point: CanvasPoint) -> Result<SourceLookup> {
        let (page, clamped) = self.layout.locate(point.y);
        let document = page.to_native(point);
        debug!(
            "canvas ({}, {}) -> page {} ({}, {})",
            point.x, point.y, document.page, document.x, document.y
        );

        let outcome = self.oracle.edit(self.document, document).await?;
        Ok(SourceLookup {
            document,
            clamped,
            outcome,
        })
    }

    /// Source location at a page-native point.
    ///
    /// # Errors
    ///
    /// [`SyncError::UnknownPage`](crate::SyncError::UnknownPage) before the
    /// oracle is invoked if the page is outside the layout.
    pub async fn source_at_document(&self, point: DocumentPoint) -> Result<SourceLookup> {
        self.layout.page(point.page)?;

        let outcome = self.oracle.edit(self.document, point).await?;
        Ok(SourceLookup {
            document: point,
            clamped: false,
            outcome,
        })
    }

    /// Canvas positions generated by a source line.
    pub async fn canvas_for_source(
        &self,
        query: &SourceQuery,
    ) -> Result<SyncOutcome<Vec<CanvasHit>>> {
        let outcome = self.oracle.view(self.document, query).await?;

        Ok(outcome.map(|hits| {
            hits.into_iter()
                .map(|hit| {
                    let canvas = match self.layout.document_to_canvas(hit.point) {
                        Ok(point) => Some(point),
                        Err(e) => {
                            warn!("dropping canvas position for synctex hit: {e}");
                            None
                        }
                    };
                    CanvasHit {
                        document: hit,
                        canvas,
                    }
                })
                .collect()
        }))
    }
}
