use glam::{Mat4, Vec2, Vec3};

/// 2D local transform of a node.
///
/// Holds position, rotation (radians around Z), scale and an anchor point,
/// plus the cached local and world matrices. The local matrix is rebuilt
/// only by [`update_local_matrix`](Self::update_local_matrix); reading it
/// before that call returns the previous value.
///
/// The local matrix is composed as
/// `translate(position) * rotate_z(rotation) * translate(-anchor) * scale(scale)`,
/// so rotation pivots around the anchor.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub anchor: Vec2,

    pub(crate) local_matrix: Mat4,
    pub(crate) world_matrix: Mat4,

    // Shadow state for change detection
    last_position: Vec2,
    last_rotation: f32,
    last_scale: Vec2,
    last_anchor: Vec2,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            anchor: Vec2::ZERO,

            local_matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,

            last_position: Vec2::ZERO,
            last_rotation: 0.0,
            last_scale: Vec2::ONE,
            last_anchor: Vec2::ZERO,
            force_update: true,
        }
    }

    /// Builds the local matrix from the current attributes without caching it.
    #[must_use]
    pub fn compute_local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position.extend(0.0))
            * Mat4::from_rotation_z(self.rotation)
            * Mat4::from_translation((-self.anchor).extend(0.0))
            * Mat4::from_scale(self.scale.extend(1.0))
    }

    /// Recomputes the local matrix if any attribute changed since the last call.
    ///
    /// Returns whether the matrix was rebuilt.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.anchor != self.last_anchor
            || self.force_update;

        if changed {
            self.local_matrix = self.compute_local_matrix();

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.last_anchor = self.anchor;
            self.force_update = false;
        }

        changed
    }

    /// Value-copies position, rotation, scale and anchor from `other`.
    ///
    /// Cached matrices are left alone and rebuilt on the next update.
    pub fn copy_from(&mut self, other: &Self) {
        self.position = other.position;
        self.rotation = other.rotation;
        self.scale = other.scale;
        self.anchor = other.anchor;
        self.mark_dirty();
    }

    #[inline]
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    #[inline]
    pub fn set_scale(&mut self, x: f32, y: f32) {
        self.scale = Vec2::new(x, y);
    }

    #[inline]
    pub fn set_anchor(&mut self, x: f32, y: f32) {
        self.anchor = Vec2::new(x, y);
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    #[inline]
    pub fn rotate(&mut self, radians: f32) {
        self.rotation += radians;
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Mat4 {
        &self.local_matrix
    }

    /// World matrix written by the last traversal.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    pub fn set_world_matrix(&mut self, mat: Mat4) {
        self.world_matrix = mat;
    }

    /// Maps a local-space point through the last world matrix.
    #[must_use]
    pub fn to_world(&self, point: Vec2) -> Vec2 {
        self.world_matrix
            .transform_point3(Vec3::new(point.x, point.y, 0.0))
            .truncate()
    }

    /// Forces the next update to rebuild the local matrix.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
