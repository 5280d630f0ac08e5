//! Grid-based animated sprite sheets.
//!
//! Frames are laid out row-major on a `columns` x `rows` grid. The current
//! frame is derived from an elapsed-time clock, so variable frame deltas
//! never drift the animation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSheetConfig {
    /// Default: 1.
    pub columns: u32,
    /// Default: 1.
    pub rows: u32,
    /// Number of used cells; `None` uses every cell. Default: `None`.
    pub frame_count: Option<u32>,
    /// Playback rate in frames per second. Default: 12.
    pub fps: f32,
    /// Wrap to the first frame after the last. Default: `true`.
    pub looping: bool,
    /// Start playing on creation. Default: `true`.
    pub autoplay: bool,
    /// Size of one frame in local units. Default: 32 x 32.
    pub frame_size: Vec2,
}

impl Default for SpriteSheetConfig {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 1,
            frame_count: None,
            fps: 12.0,
            looping: true,
            autoplay: true,
            frame_size: Vec2::splat(32.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    config: SpriteSheetConfig,
    elapsed: f32,
    frame: u32,
    playing: bool,
    finished: bool,
}

impl SpriteSheet {
    #[must_use]
    pub fn new(config: SpriteSheetConfig) -> Self {
        let playing = config.autoplay;
        Self {
            config,
            elapsed: 0.0,
            frame: 0,
            playing,
            finished: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SpriteSheetConfig {
        &self.config
    }

    /// Number of playable frames.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        let cells = self.config.columns.max(1) * self.config.rows.max(1);
        self.config.frame_count.map_or(cells, |n| n.clamp(1, cells))
    }

    #[must_use]
    pub fn current_frame(&self) -> u32 {
        self.frame
    }

    #[must_use]
    pub fn frame_size(&self) -> Vec2 {
        self.config.frame_size
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// A non-looping sheet that reached its last frame.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn play(&mut self) {
        if self.finished {
            self.goto_frame(0);
        }
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Jumps to `frame` (clamped) and restarts the clock from there.
    pub fn goto_frame(&mut self, frame: u32) {
        self.frame = frame.min(self.frame_count() - 1);
        self.elapsed = if self.config.fps > 0.0 {
            self.frame as f32 / self.config.fps
        } else {
            0.0
        };
        self.finished = false;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.playing || self.config.fps <= 0.0 {
            return;
        }
        self.elapsed += dt.max(0.0);

        let count = self.frame_count();
        let ticks = (self.elapsed * self.config.fps).floor() as u64;
        if self.config.looping {
            self.frame = (ticks % u64::from(count)) as u32;
        } else if ticks >= u64::from(count) {
            self.frame = count - 1;
            self.finished = true;
            self.playing = false;
        } else {
            self.frame = ticks as u32;
        }
    }

    /// Normalized texture coordinates of the current frame.
    #[must_use]
    pub fn frame_uv(&self) -> Rect {
        let columns = self.config.columns.max(1);
        let rows = self.config.rows.max(1);
        let col = self.frame % columns;
        let row = self.frame / columns;
        let cell = Vec2::new(1.0 / columns as f32, 1.0 / rows as f32);
        let min = Vec2::new(col as f32, row as f32) * cell;
        Rect::new(min, min + cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(looping: bool) -> SpriteSheet {
        SpriteSheet::new(SpriteSheetConfig {
            columns: 4,
            rows: 2,
            frame_count: Some(6),
            fps: 10.0,
            looping,
            ..Default::default()
        })
    }

    #[test]
    fn advances_with_elapsed_time() {
        let mut s = sheet(true);
        s.update(0.05);
        assert_eq!(s.current_frame(), 0);
        s.update(0.1);
        assert_eq!(s.current_frame(), 1);
        s.update(0.5);
        assert_eq!(s.current_frame(), 0, "six frames wrap after 0.6s");
    }

    #[test]
    fn non_looping_holds_last_frame() {
        let mut s = sheet(false);
        s.update(2.0);
        assert_eq!(s.current_frame(), 5);
        assert!(s.is_finished());
        assert!(!s.is_playing());

        s.play();
        assert_eq!(s.current_frame(), 0);
        assert!(s.is_playing());
    }

    #[test]
    fn uv_rect_follows_row_major_layout() {
        let mut s = sheet(true);
        s.goto_frame(5);
        let uv = s.frame_uv();
        assert_eq!(uv.min, Vec2::new(0.25, 0.5));
        assert_eq!(uv.max, Vec2::new(0.5, 1.0));
    }

    #[test]
    fn stopped_sheet_does_not_advance() {
        let mut s = sheet(true);
        s.stop();
        s.update(1.0);
        assert_eq!(s.current_frame(), 0);
    }
}
