//! Visual content carried by nodes.
//!
//! Every [`Node`](crate::Node) holds exactly one [`Content`] variant. The
//! scene calls [`Content::update`] once per tick for every attached node,
//! and the debug pass reads [`Content::local_bounds`].
//!
//! Content is described in configuration files through [`ContentConfig`],
//! whose variants wrap the per-kind config structs and convert into live
//! content with `Content::from`.

pub mod grid;
pub mod particles;
pub mod sprite_sheet;
pub mod texture;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

pub use grid::{GridConfig, LineGrid};
pub use particles::{EmitterConfig, Particle, ParticleEmitter};
pub use sprite_sheet::{SpriteSheet, SpriteSheetConfig};
pub use texture::{TextureConfig, TextureContent, TextureHandle, TextureState};

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle spanning `(0, 0)` to `size`.
    #[must_use]
    pub fn from_size(size: Vec2) -> Self {
        Self {
            min: Vec2::ZERO,
            max: size,
        }
    }

    /// Smallest rectangle containing every point. `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidColor {
    pub size: Vec2,
    pub color: Vec4,
}

impl Default for SolidColor {
    fn default() -> Self {
        Self {
            size: Vec2::splat(1.0),
            color: Vec4::ONE,
        }
    }
}

/// The visual capability of a node.
#[derive(Debug, Clone, Default)]
pub enum Content {
    /// Pure grouping node with nothing to draw.
    #[default]
    Empty,
    SolidColor(SolidColor),
    Texture(TextureContent),
    SpriteSheet(SpriteSheet),
    Particles(ParticleEmitter),
    Grid(LineGrid),
}

impl Content {
    /// Per-frame hook.
    pub fn update(&mut self, dt: f32) {
        match self {
            Self::SpriteSheet(sheet) => sheet.update(dt),
            Self::Particles(emitter) => emitter.update(dt),
            Self::Empty | Self::SolidColor(_) | Self::Texture(_) | Self::Grid(_) => {}
        }
    }

    /// Local-space extent, before the node transform is applied.
    #[must_use]
    pub fn local_bounds(&self) -> Option<Rect> {
        match self {
            Self::Empty => None,
            Self::SolidColor(solid) => Some(Rect::from_size(solid.size)),
            Self::Texture(texture) => Some(Rect::from_size(texture.size)),
            Self::SpriteSheet(sheet) => Some(Rect::from_size(sheet.frame_size())),
            Self::Particles(emitter) => emitter.bounds(),
            Self::Grid(grid) => Some(Rect::from_size(grid.config().size)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::SolidColor(_) => "solid_color",
            Self::Texture(_) => "texture",
            Self::SpriteSheet(_) => "sprite_sheet",
            Self::Particles(_) => "particles",
            Self::Grid(_) => "grid",
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

macro_rules! impl_from_content {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Content {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_content! {
    SolidColor(SolidColor),
    Texture(TextureContent),
    SpriteSheet(SpriteSheet),
    Particles(ParticleEmitter),
    Grid(LineGrid),
}

/// Serializable description of a [`Content`] value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentConfig {
    #[default]
    Empty,
    SolidColor(SolidColor),
    Texture(TextureConfig),
    SpriteSheet(SpriteSheetConfig),
    Particles(EmitterConfig),
    Grid(GridConfig),
}

impl From<ContentConfig> for Content {
    fn from(config: ContentConfig) -> Self {
        match config {
            ContentConfig::Empty => Self::Empty,
            ContentConfig::SolidColor(solid) => Self::SolidColor(solid),
            ContentConfig::Texture(c) => Self::Texture(TextureContent::new(c)),
            ContentConfig::SpriteSheet(c) => Self::SpriteSheet(SpriteSheet::new(c)),
            ContentConfig::Particles(c) => Self::Particles(ParticleEmitter::new(c)),
            ContentConfig::Grid(c) => Self::Grid(LineGrid::new(c)),
        }
    }
}
