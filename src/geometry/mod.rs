//! Page geometry: per-page native extents stacked onto a single canvas axis.
//!
//! A [`PageLayout`] is built once from a sequence of [`PageSpec`]s (usually
//! read from page files by [`resolve_layout`]) and never mutated afterwards.
//! Every page is scaled to the same target width, so pages with different
//! native widths get different scales.
//!
//! # Example
//!
//! ```rust
//! use pagesync::geometry::{LayoutOptions, PageLayout, PageSpec};
//!
//! let layout = PageLayout::from_specs(
//!     [PageSpec::new(600.0, 800.0), PageSpec::new(600.0, 1000.0)],
//!     LayoutOptions::default(),
//! )?;
//! assert_eq!(layout.page_count(), 2);
//! # Ok::<(), pagesync::SyncError>(())
//! ```

pub mod markup;
pub mod resolver;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

pub use markup::parse_page_markup;
pub use resolver::{resolve_layout, PageSource};

/// Native width used when a page declares no usable geometry (US Letter, points).
pub const DEFAULT_PAGE_WIDTH: f64 = 612.0;
/// Native height used when a page declares no usable geometry (US Letter, points).
pub const DEFAULT_PAGE_HEIGHT: f64 = 792.0;

/// Where a page's native geometry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometrySource {
    /// Read from the page's own markup.
    Declared,
    /// The page's markup was missing or malformed; default size used.
    Default,
}

/// Native extent and origin of one page, before layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    pub width: f64,
    pub height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub source: GeometrySource,
}

impl PageSpec {
    /// A declared page with its origin at `(0, 0)`.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            origin_x: 0.0,
            origin_y: 0.0,
            source: GeometrySource::Declared,
        }
    }

    /// Set a nonzero native origin (e.g. SVG `viewBox` minimums).
    #[must_use]
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// The default-size page used when geometry cannot be determined.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            source: GeometrySource::Default,
            ..Self::new(DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT)
        }
    }

    /// Finite, strictly positive extent and finite origin.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
            && self.origin_x.is_finite()
            && self.origin_y.is_finite()
    }
}

/// Target width and inter-page gap used to stack pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub target_width: f64,
    pub spacing: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            target_width: 800.0,
            spacing: 32.0,
        }
    }
}

impl LayoutOptions {
    fn validate(&self) -> Result<()> {
        if !self.target_width.is_finite() || self.target_width <= 0.0 {
            return Err(SyncError::Configuration(format!(
                "target width must be positive, got {}",
                self.target_width
            )));
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(SyncError::Configuration(format!(
                "page spacing must be non-negative, got {}",
                self.spacing
            )));
        }
        Ok(())
    }
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageGeometry {
    /// 1-based page number.
    pub page: u32,
    pub native_width: f64,
    pub native_height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    /// `target_width / native_width`.
    pub scale: f64,
    pub canvas_top: f64,
    pub canvas_bottom: f64,
    pub source: GeometrySource,
}

impl PageGeometry {
    /// Whether `y` lies in this page's half-open band `[top, bottom)`.
    #[must_use]
    pub fn contains_y(&self, y: f64) -> bool {
        self.canvas_top <= y && y < self.canvas_bottom
    }

    /// Scaled height on the canvas.
    #[must_use]
    pub fn canvas_height(&self) -> f64 {
        self.canvas_bottom - self.canvas_top
    }
}

/// Immutable, ordered page layout. Always holds at least one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pages: Vec<PageGeometry>,
    options: LayoutOptions,
}

impl PageLayout {
    /// Stack `specs` (page 1 first) onto the canvas.
    ///
    /// # Errors
    ///
    /// [`SyncError::Configuration`] if there are no pages, a page has a
    /// non-positive extent, or the options are invalid.
    pub fn from_specs(
        specs: impl IntoIterator<Item = PageSpec>,
        options: LayoutOptions,
    ) -> Result<Self> {
        options.validate()?;

        let mut pages = Vec::new();
        let mut top = 0.0;

        for (index, spec) in specs.into_iter().enumerate() {
            let page = u32::try_from(index + 1)
                .map_err(|_| SyncError::Configuration("too many pages".to_string()))?;

            if !spec.is_usable() {
                return Err(SyncError::Configuration(format!(
                    "page {page} has unusable geometry {}x{}",
                    spec.width, spec.height
                )));
            }

            let scale = options.target_width / spec.width;
            let bottom = top + spec.height * scale;

            pages.push(PageGeometry {
                page,
                native_width: spec.width,
                native_height: spec.height,
                origin_x: spec.origin_x,
                origin_y: spec.origin_y,
                scale,
                canvas_top: top,
                canvas_bottom: bottom,
                source: spec.source,
            });

            top = bottom + options.spacing;
        }

        if pages.is_empty() {
            return Err(SyncError::Configuration(
                "no pages found in document".to_string(),
            ));
        }

        Ok(Self { pages, options })
    }

    /// All pages in page-number order.
    #[must_use]
    pub fn pages(&self) -> &[PageGeometry] {
        &self.pages
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn options(&self) -> LayoutOptions {
        self.options
    }

    /// Look up a page by its 1-based number.
    ///
    /// # Errors
    ///
    /// [`SyncError::UnknownPage`] for page 0 or a page past the end.
    pub fn page(&self, page: u32) -> Result<&PageGeometry> {
        let index = usize::try_from(page).ok().and_then(|p| p.checked_sub(1));
        index
            .and_then(|i| self.pages.get(i))
            .ok_or(SyncError::UnknownPage {
                page,
                page_count: self.pages.len(),
            })
    }

    /// The page whose band strictly contains `y`, if any.
    #[must_use]
    pub fn page_at(&self, y: f64) -> Option<&PageGeometry> {
        self.pages.iter().find(|p| p.contains_y(y))
    }

    #[must_use]
    pub fn last_page(&self) -> &PageGeometry {
        // Construction rejects empty layouts.
        &self.pages[self.pages.len() - 1]
    }

    /// Bottom edge of the last page.
    #[must_use]
    pub fn canvas_height(&self) -> f64 {
        self.last_page().canvas_bottom
    }
}
