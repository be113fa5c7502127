//! Conversions between canvas coordinates and page-native document coordinates.
//!
//! Both directions are pure functions of the point and a borrowed
//! [`PageLayout`], so a single layout can be shared across threads.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::geometry::{PageGeometry, PageLayout};

/// A point on the global canvas axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in one page's native coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentPoint {
    pub page: u32,
    pub x: f64,
    pub y: f64,
}

impl DocumentPoint {
    #[must_use]
    pub fn new(page: u32, x: f64, y: f64) -> Self {
        Self { page, x, y }
    }
}

impl PageGeometry {
    /// Canvas point to this page's native coordinates.
    #[must_use]
    pub fn to_native(&self, point: CanvasPoint) -> DocumentPoint {
        DocumentPoint {
            page: self.page,
            x: point.x / self.scale + self.origin_x,
            y: (point.y - self.canvas_top) / self.scale + self.origin_y,
        }
    }

    /// Native coordinates on this page to the canvas. Ignores `point.page`.
    #[must_use]
    pub fn to_canvas(&self, point: DocumentPoint) -> CanvasPoint {
        CanvasPoint {
            x: (point.x - self.origin_x) * self.scale,
            y: self.canvas_top + (point.y - self.origin_y) * self.scale,
        }
    }
}

impl PageLayout {
    /// The page a canvas `y` is attributed to, and whether that required
    /// the last-page fallback.
    ///
    /// Points in an inter-page gap, above the first page or below the last
    /// page are attributed to the last page rather than rejected.
    #[must_use]
    pub fn locate(&self, y: f64) -> (&PageGeometry, bool) {
        match self.page_at(y) {
            Some(page) => (page, false),
            None => {
                let last = self.last_page();
                debug!("y={y} outside every page band; attributing to page {}", last.page);
                (last, true)
            }
        }
    }

    /// Convert a canvas point to document coordinates.
    #[must_use]
    pub fn canvas_to_document(&self, point: CanvasPoint) -> DocumentPoint {
        self.locate(point.y).0.to_native(point)
    }

    /// Convert document coordinates to a canvas point.
    ///
    /// # Errors
    ///
    /// [`SyncError::UnknownPage`](crate::SyncError::UnknownPage) if
    /// `point.page` is outside the layout.
    pub fn document_to_canvas(&self, point: DocumentPoint) -> Result<CanvasPoint> {
        Ok(self.page(point.page)?.to_canvas(point))
    }
}
