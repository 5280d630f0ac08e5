//! Resource-loader contract.
//!
//! Image fetching lives outside the scene graph. A loader is told to start
//! loading a url and later reports completions through [`ResourceLoader::poll`];
//! the scene stores the resulting texture handle on every matching
//! [`TextureContent`](crate::content::TextureContent).

use crate::content::TextureHandle;

/// Completion of one load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEvent {
    pub url: String,
    pub result: Result<TextureHandle, String>,
}

impl LoadEvent {
    pub fn loaded(url: impl Into<String>, handle: TextureHandle) -> Self {
        Self {
            url: url.into(),
            result: Ok(handle),
        }
    }

    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            result: Err(reason.into()),
        }
    }
}

pub trait ResourceLoader {
    /// Begins loading `url`. Completion is reported later by [`poll`](Self::poll).
    fn start_load(&mut self, url: &str);

    /// Drains completions that arrived since the last poll.
    fn poll(&mut self) -> Vec<LoadEvent>;
}
