use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle of a texture owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextureState {
    /// No load has been requested yet.
    #[default]
    Pending,
    /// A loader is fetching the image.
    Loading,
    Loaded(TextureHandle),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Location handed to the resource loader.
    pub url: String,
    /// Drawn size in local units. Defaults to zero until the caller sets it.
    pub size: Vec2,
}

/// A static image whose texture arrives asynchronously from a loader.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureContent {
    pub url: String,
    pub size: Vec2,
    pub state: TextureState,
}

impl TextureContent {
    #[must_use]
    pub fn new(config: TextureConfig) -> Self {
        Self {
            url: config.url,
            size: config.size,
            state: TextureState::Pending,
        }
    }

    /// The backend texture, once loaded.
    #[must_use]
    pub fn texture(&self) -> Option<TextureHandle> {
        match self.state {
            TextureState::Loaded(handle) => Some(handle),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, TextureState::Loaded(_))
    }
}
