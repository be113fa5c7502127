//! Discover page files on disk and lay them out.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{parse_page_markup, LayoutOptions, PageLayout, PageSpec};
use crate::error::{Result, SyncError};

/// Naming pattern for per-page description files:
/// `dir / prefix + zero-padded page + "." + extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSource {
    pub dir: PathBuf,
    pub prefix: String,
    pub extension: String,
    pub pad_width: usize,
}

impl PageSource {
    /// `page-001.svg`, `page-002.svg`, ... in `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "page-".to_string(),
            extension: "svg".to_string(),
            pad_width: 3,
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Extension without the leading dot.
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    #[must_use]
    pub fn with_pad_width(mut self, pad_width: usize) -> Self {
        self.pad_width = pad_width;
        self
    }

    /// File name expected for `page`.
    #[must_use]
    pub fn file_name(&self, page: u32) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            page,
            self.extension,
            width = self.pad_width
        )
    }

    #[must_use]
    pub fn path_for(&self, page: u32) -> PathBuf {
        self.dir.join(self.file_name(page))
    }

    /// Read page specs in order until the first missing page file.
    ///
    /// Unreadable or undeclared geometry falls back to the default page size.
    pub fn read_specs(&self) -> Result<Vec<PageSpec>> {
        if !self.dir.is_dir() {
            return Err(SyncError::Configuration(format!(
                "page directory {} does not exist",
                self.dir.display()
            )));
        }

        let mut specs = Vec::new();
        for page in 1_u32.. {
            let path = self.path_for(page);
            let Some(spec) = read_page(&path, &self.extension) else {
                debug!("no {} - stopping after {} pages", path.display(), specs.len());
                break;
            };
            specs.push(spec);
        }

        Ok(specs)
    }
}

/// `None` when the page file does not exist.
fn read_page(path: &Path, extension: &str) -> Option<PageSpec> {
    let content = match std::fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("cannot read {}: {e}; using default page size", path.display());
            return Some(PageSpec::fallback());
        }
    };

    if let Some(spec) = parse_page_markup(&content, extension) {
        debug!(
            "{}: {}x{} at ({}, {})",
            path.display(),
            spec.width,
            spec.height,
            spec.origin_x,
            spec.origin_y
        );
        Some(spec)
    } else {
        warn!(
            "no usable geometry in {}; using default page size",
            path.display()
        );
        Some(PageSpec::fallback())
    }
}

/// Resolve every page in `source` and stack them with `options`.
///
/// # Errors
///
/// [`SyncError::Configuration`] if the directory is missing or holds no
/// first page.
pub fn resolve_layout(source: &PageSource, options: LayoutOptions) -> Result<PageLayout> {
    let specs = source.read_specs()?;

    if specs.is_empty() {
        return Err(SyncError::Configuration(format!(
            "no pages found: expected {}",
            source.path_for(1).display()
        )));
    }

    let layout = PageLayout::from_specs(specs, options)?;
    info!(
        "Resolved {} pages from {} (canvas height {:.2})",
        layout.page_count(),
        source.dir.display(),
        layout.canvas_height()
    );
    Ok(layout)
}
