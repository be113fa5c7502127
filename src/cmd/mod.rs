pub mod convert;
pub mod locate;
pub mod output;
pub mod pages;
pub mod source;

pub use convert::{cmd_to_canvas, cmd_to_document};
pub use locate::cmd_locate;
pub use pages::cmd_pages;
pub use source::cmd_source;

use pagesync::{resolve_layout, PageLayout, Settings, SyncError, SynctexCli};

/// Resolve the page layout described by `settings`.
pub fn load_layout(settings: &Settings) -> pagesync::Result<PageLayout> {
    resolve_layout(&settings.page_source(), settings.layout_options())
}

/// Build the synctex oracle described by `settings`.
///
/// A zero timeout would fail every lookup, so it is rejected.
pub fn oracle(settings: &Settings) -> pagesync::Result<SynctexCli> {
    if settings.timeout_secs == 0 {
        return Err(SyncError::Configuration(
            "timeout must be at least 1 second".to_string(),
        ));
    }

    let cli = SynctexCli::new().with_timeout(settings.timeout());
    Ok(match settings.synctex_path {
        Some(ref path) => cli.with_synctex_path(&path.to_string_lossy()),
        None => cli,
    })
}
