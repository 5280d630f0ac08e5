//! Transform Tests
//!
//! Tests for:
//! - Transform defaults and setters
//! - Local matrix composition order and change detection
//! - Value copy and clone semantics
//! - World matrices written by the scene traversal

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::{Mat4, Vec2, Vec3};
use glint::scene::{Scene, Transform};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec2_approx(a: Vec2, b: Vec2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn apply(m: &Mat4, p: Vec2) -> Vec2 {
    m.transform_point3(p.extend(0.0)).truncate()
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let mut t = Transform::new();
    assert_eq!(t.position, Vec2::ZERO);
    assert_eq!(t.rotation, 0.0);
    assert_eq!(t.scale, Vec2::ONE);
    assert_eq!(t.anchor, Vec2::ZERO);

    t.update_local_matrix();
    assert_eq!(*t.local_matrix(), Mat4::IDENTITY);
}

#[test]
fn setters_and_increments() {
    let mut t = Transform::default();
    t.set_position(1.0, 2.0);
    t.translate(Vec2::new(0.5, -1.0));
    t.set_scale(3.0, 4.0);
    t.set_anchor(0.25, 0.75);
    t.rotate(FRAC_PI_4);
    t.rotate(FRAC_PI_4);

    assert_eq!(t.position, Vec2::new(1.5, 1.0));
    assert_eq!(t.scale, Vec2::new(3.0, 4.0));
    assert_eq!(t.anchor, Vec2::new(0.25, 0.75));
    assert!(approx_eq(t.rotation, FRAC_PI_2));
}

#[test]
fn local_matrix_matches_manual_composition() {
    let mut t = Transform::new();
    t.position = Vec2::new(4.0, -2.0);
    t.rotation = 0.3;
    t.scale = Vec2::new(1.5, 0.5);
    t.anchor = Vec2::new(2.0, 1.0);
    t.update_local_matrix();

    for p in [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(-3.0, 7.0)] {
        // scale, shift by -anchor, rotate, then place at position
        let scaled = p * t.scale;
        let shifted = scaled - t.anchor;
        let rotated = Vec2::from_angle(t.rotation).rotate(shifted);
        let expected = rotated + t.position;
        assert!(vec2_approx(apply(t.local_matrix(), p), expected), "{p:?}");
    }
}

#[test]
fn matrix_is_stale_until_recomputed() {
    let mut t = Transform::new();
    t.update_local_matrix();

    t.set_position(5.0, 5.0);
    assert_eq!(*t.local_matrix(), Mat4::IDENTITY);

    assert!(t.update_local_matrix());
    assert!(vec2_approx(apply(t.local_matrix(), Vec2::ZERO), Vec2::new(5.0, 5.0)));
}

#[test]
fn mark_dirty_forces_a_rebuild() {
    let mut t = Transform::new();
    t.update_local_matrix();
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
}

#[test]
fn half_turn_around_centered_anchor() {
    let mut t = Transform::new();
    t.anchor = Vec2::new(1.0, 1.0);
    t.position = Vec2::new(1.0, 1.0);
    t.rotation = PI;
    t.update_local_matrix();

    // A 2x2 square rotated about its center maps corners onto opposite corners.
    assert!(vec2_approx(apply(t.local_matrix(), Vec2::ZERO), Vec2::new(2.0, 2.0)));
    assert!(vec2_approx(apply(t.local_matrix(), Vec2::new(2.0, 0.0)), Vec2::new(0.0, 2.0)));
}

// ============================================================================
// Copy Semantics
// ============================================================================

#[test]
fn clone_is_independent() {
    let mut original = Transform::new();
    original.set_position(1.0, 1.0);
    original.set_anchor(0.5, 0.5);

    let mut copy = original.clone();
    copy.set_position(9.0, 9.0);

    assert_eq!(original.position, Vec2::new(1.0, 1.0));
    assert_eq!(copy.anchor, Vec2::new(0.5, 0.5));
}

#[test]
fn copy_from_copies_every_attribute() {
    let mut src = Transform::new();
    src.position = Vec2::new(3.0, 4.0);
    src.rotation = 1.0;
    src.scale = Vec2::new(2.0, 3.0);
    src.anchor = Vec2::new(0.5, 0.5);

    let mut dst = Transform::new();
    dst.copy_from(&src);

    assert_eq!(dst.position, src.position);
    assert_eq!(dst.rotation, src.rotation);
    assert_eq!(dst.scale, src.scale);
    assert_eq!(dst.anchor, src.anchor);
}

// ============================================================================
// World Matrices
// ============================================================================

#[test]
fn traversal_writes_world_matrices() {
    let mut scene = Scene::new();
    let root = scene.root();
    let parent = scene
        .build_node("parent")
        .with_position(100.0, 0.0)
        .with_scale(2.0, 2.0)
        .with_parent(root)
        .build()
        .unwrap();
    let child = scene
        .build_node("child")
        .with_position(10.0, 0.0)
        .with_rotation(FRAC_PI_2)
        .with_parent(parent)
        .build()
        .unwrap();

    scene.traverse();

    let child_node = scene.node(child).unwrap();
    assert!(vec2_approx(child_node.transform.to_world(Vec2::ZERO), Vec2::new(120.0, 0.0)));
    // Local +x of the child is rotated to +y and scaled by the parent.
    assert!(vec2_approx(
        child_node.transform.to_world(Vec2::new(1.0, 0.0)),
        Vec2::new(120.0, 2.0)
    ));
}

#[test]
fn moving_a_node_moves_its_subtree() {
    let mut scene = Scene::new();
    let root = scene.root();
    let parent = scene.build_node("parent").with_parent(root).build().unwrap();
    let child = scene
        .build_node("child")
        .with_position(1.0, 1.0)
        .with_parent(parent)
        .build()
        .unwrap();

    scene.traverse();
    let before = scene.node(child).unwrap().transform.to_world(Vec2::ZERO);

    scene
        .node_mut(parent)
        .unwrap()
        .transform
        .translate(Vec2::new(5.0, -5.0));
    scene.traverse();
    let after = scene.node(child).unwrap().transform.to_world(Vec2::ZERO);

    assert!(vec2_approx(after - before, Vec2::new(5.0, -5.0)));
    let origin = scene.node(child).unwrap().world_matrix().transform_point3(Vec3::ZERO);
    assert!(vec2_approx(origin.truncate(), Vec2::new(6.0, -4.0)));
}
