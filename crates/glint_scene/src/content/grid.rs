use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Covered area in local units. Default: 100 x 100.
    pub size: Vec2,
    /// Distance between lines. Non-positive spacing draws nothing. Default: 10.
    pub spacing: f32,
    /// Default: opaque mid grey.
    pub color: Vec4,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: Vec2::splat(100.0),
            spacing: 10.0,
            color: Vec4::new(0.5, 0.5, 0.5, 1.0),
        }
    }
}

/// Evenly spaced line grid, typically used as a debug backdrop.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGrid {
    config: GridConfig,
}

impl LineGrid {
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Line segments in local space: vertical lines left to right, then
    /// horizontal lines top to bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<(Vec2, Vec2)> {
        let GridConfig { size, spacing, .. } = self.config;
        if spacing <= 0.0 || size.x < 0.0 || size.y < 0.0 {
            return Vec::new();
        }

        let columns = (size.x / spacing).floor() as usize + 1;
        let rows = (size.y / spacing).floor() as usize + 1;
        let mut out = Vec::with_capacity(columns + rows);

        for i in 0..columns {
            let x = i as f32 * spacing;
            out.push((Vec2::new(x, 0.0), Vec2::new(x, size.y)));
        }
        for j in 0..rows {
            let y = j as f32 * spacing;
            out.push((Vec2::new(0.0, y), Vec2::new(size.x, y)));
        }
        out
    }
}
