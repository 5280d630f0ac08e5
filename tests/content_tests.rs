//! Content Tests
//!
//! Tests for:
//! - Per-frame content updates driven by the scene tick
//! - Sprite sheet playback and UVs
//! - Particle emission determinism and fading
//! - Texture loading through a resource loader
//! - Content described in JSON

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec2;
use glint::scene::content::{
    Content, ContentConfig, EmitterConfig, GridConfig, LineGrid, ParticleEmitter, SpriteSheet,
    SpriteSheetConfig, TextureConfig, TextureContent, TextureHandle, TextureState,
};
use glint::scene::{LoadEvent, ResourceLoader, Scene};

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn sprite_sheet(scene: &Scene, handle: glint::core::NodeHandle) -> &SpriteSheet {
    match &scene.node(handle).unwrap().content {
        Content::SpriteSheet(sheet) => sheet,
        other => panic!("expected a sprite sheet, got {}", other.kind()),
    }
}

fn texture(scene: &Scene, handle: glint::core::NodeHandle) -> &TextureContent {
    match &scene.node(handle).unwrap().content {
        Content::Texture(texture) => texture,
        other => panic!("expected a texture, got {}", other.kind()),
    }
}

// ============================================================================
// Scene Tick
// ============================================================================

#[test]
fn tick_updates_attached_content_only() {
    let mut scene = Scene::new();
    let root = scene.root();
    let config = SpriteSheetConfig {
        columns: 4,
        rows: 1,
        fps: 10.0,
        ..SpriteSheetConfig::default()
    };
    let attached = scene
        .build_node("walk")
        .with_content(SpriteSheet::new(config.clone()))
        .with_parent(root)
        .build()
        .unwrap();
    let loose = scene
        .build_node("idle")
        .with_content(SpriteSheet::new(config))
        .build()
        .unwrap();

    for _ in 0..3 {
        scene.tick(0.1);
    }

    assert_eq!(sprite_sheet(&scene, attached).current_frame(), 3);
    assert_eq!(sprite_sheet(&scene, loose).current_frame(), 0);
}

#[test]
fn content_updates_run_before_the_frame_signal() {
    let mut scene = Scene::new();
    let root = scene.root();
    let handle = scene
        .build_node("sheet")
        .with_content(SpriteSheet::new(SpriteSheetConfig {
            columns: 8,
            fps: 10.0,
            ..SpriteSheetConfig::default()
        }))
        .with_parent(root)
        .build()
        .unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    scene.events.frame.connect(move |info| sink.borrow_mut().push(info.dt));

    scene.update(0.25);

    assert_eq!(sprite_sheet(&scene, handle).current_frame(), 2);
    assert_eq!(*seen.borrow(), vec![0.25]);
}

// ============================================================================
// Sprite Sheets
// ============================================================================

#[test]
fn non_looping_sheet_holds_last_frame() {
    let mut sheet = SpriteSheet::new(SpriteSheetConfig {
        columns: 3,
        rows: 1,
        fps: 10.0,
        looping: false,
        ..SpriteSheetConfig::default()
    });

    sheet.update(1.0);
    assert_eq!(sheet.current_frame(), 2);
    assert!(sheet.is_finished());
    assert!(!sheet.is_playing());

    sheet.play();
    assert_eq!(sheet.current_frame(), 0);
    assert!(sheet.is_playing());
}

#[test]
fn frame_uv_walks_the_grid_row_major() {
    let mut sheet = SpriteSheet::new(SpriteSheetConfig {
        columns: 2,
        rows: 2,
        autoplay: false,
        ..SpriteSheetConfig::default()
    });

    sheet.goto_frame(3);
    let uv = sheet.frame_uv();
    assert_eq!(uv.min, Vec2::new(0.5, 0.5));
    assert_eq!(uv.max, Vec2::new(1.0, 1.0));

    // Stopped sheets ignore time.
    sheet.update(10.0);
    assert_eq!(sheet.current_frame(), 3);
}

// ============================================================================
// Particles
// ============================================================================

#[test]
fn same_seed_gives_same_particles() {
    let config = EmitterConfig {
        rate: 50.0,
        seed: 42,
        ..EmitterConfig::default()
    };
    let mut a = ParticleEmitter::new(config.clone());
    let mut b = ParticleEmitter::new(config);

    for _ in 0..10 {
        a.update(0.05);
        b.update(0.05);
    }

    assert!(!a.particles().is_empty());
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn emission_follows_rate_and_cap() {
    let mut emitter = ParticleEmitter::new(EmitterConfig {
        rate: 20.0,
        lifetime: 10.0,
        max_particles: 15,
        ..EmitterConfig::default()
    });

    emitter.update(0.5);
    assert_eq!(emitter.particles().len(), 10);

    emitter.update(0.5);
    assert_eq!(emitter.particles().len(), 15);

    emitter.set_emitting(false);
    emitter.burst(100);
    assert_eq!(emitter.particles().len(), 15);
}

#[test]
fn particles_fade_and_expire() {
    let mut emitter = ParticleEmitter::new(EmitterConfig {
        rate: 0.0,
        lifetime: 1.0,
        start_alpha: 1.0,
        end_alpha: 0.0,
        ..EmitterConfig::default()
    });
    emitter.burst(3);
    emitter.update(0.25);

    let p = emitter.particles()[0];
    assert!(approx_eq(emitter.particle_alpha(&p), 0.75));

    emitter.update(1.0);
    assert!(emitter.particles().is_empty());
    assert!(Content::from(emitter).local_bounds().is_none());
}

#[test]
fn gravity_bends_trajectories() {
    let mut emitter = ParticleEmitter::new(EmitterConfig {
        rate: 0.0,
        speed_min: 0.0,
        speed_max: 0.0,
        gravity: Vec2::new(0.0, -10.0),
        lifetime: 5.0,
        ..EmitterConfig::default()
    });
    emitter.burst(1);
    emitter.update(1.0);

    let p = emitter.particles()[0];
    assert!(approx_eq(p.velocity.y, -10.0));
    assert!(p.position.y < 0.0);
}

// ============================================================================
// Grid
// ============================================================================

#[test]
fn grid_lists_vertical_then_horizontal_lines() {
    let grid = LineGrid::new(GridConfig {
        size: Vec2::new(30.0, 10.0),
        spacing: 10.0,
        ..GridConfig::default()
    });

    let lines = grid.lines();
    assert_eq!(lines.len(), 4 + 2);
    assert!(lines[..4].iter().all(|(a, b)| approx_eq(a.x, b.x)));
    assert!(lines[4..].iter().all(|(a, b)| approx_eq(a.y, b.y)));
}

// ============================================================================
// Texture Loading
// ============================================================================

/// Loader that completes requests on the next poll.
#[derive(Default)]
struct QueuedLoader {
    started: Vec<String>,
    pending: VecDeque<LoadEvent>,
    fail: Vec<String>,
}

impl ResourceLoader for QueuedLoader {
    fn start_load(&mut self, url: &str) {
        self.started.push(url.to_owned());
        let id = self.started.len() as u32;
        let event = if self.fail.iter().any(|f| f == url) {
            LoadEvent::failed(url, "404")
        } else {
            LoadEvent::loaded(url, TextureHandle(id))
        };
        self.pending.push_back(event);
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        self.pending.drain(..).collect()
    }
}

fn add_texture(scene: &mut Scene, name: &str, url: &str) -> glint::core::NodeHandle {
    let root = scene.root();
    scene
        .build_node(name)
        .with_content(TextureContent::new(TextureConfig {
            url: url.to_owned(),
            size: Vec2::new(16.0, 16.0),
        }))
        .with_parent(root)
        .build()
        .unwrap()
}

#[test]
fn textures_load_once_per_url() {
    let mut scene = Scene::new();
    let a = add_texture(&mut scene, "a", "hero.png");
    let b = add_texture(&mut scene, "b", "hero.png");
    let c = add_texture(&mut scene, "c", "sky.png");

    let mut loader = QueuedLoader::default();
    assert_eq!(scene.request_textures(&mut loader), 2);
    assert_eq!(loader.started, vec!["hero.png", "sky.png"]);
    assert_eq!(texture(&scene, a).state, TextureState::Loading);

    // Nothing pending anymore, so a second request starts nothing.
    assert_eq!(scene.request_textures(&mut loader), 0);

    let loaded = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&loaded);
    scene
        .events
        .texture_loaded
        .connect(move |event: &LoadEvent| sink.borrow_mut().push(event.url.clone()));

    assert_eq!(scene.pump_loads(&mut loader), 2);
    assert_eq!(texture(&scene, a).texture(), Some(TextureHandle(1)));
    assert_eq!(texture(&scene, b).texture(), Some(TextureHandle(1)));
    assert_eq!(texture(&scene, c).texture(), Some(TextureHandle(2)));
    assert_eq!(*loaded.borrow(), vec!["hero.png", "sky.png"]);
}

#[test]
fn failed_loads_are_recorded() {
    let mut scene = Scene::new();
    let handle = add_texture(&mut scene, "broken", "missing.png");

    let mut loader = QueuedLoader {
        fail: vec!["missing.png".to_owned()],
        ..QueuedLoader::default()
    };
    scene.request_textures(&mut loader);
    scene.pump_loads(&mut loader);

    let tex = texture(&scene, handle);
    assert_eq!(tex.state, TextureState::Failed("404".to_owned()));
    assert!(!tex.is_loaded());
}

#[test]
fn detached_textures_are_not_requested() {
    let mut scene = Scene::new();
    let handle = add_texture(&mut scene, "later", "later.png");
    scene.remove_from_parent(handle).unwrap();

    let mut loader = QueuedLoader::default();
    assert_eq!(scene.request_textures(&mut loader), 0);
    assert_eq!(texture(&scene, handle).state, TextureState::Pending);

    // A completion still applies to it directly.
    let updated = scene.apply_load_event(&LoadEvent::loaded("later.png", TextureHandle(9)));
    assert_eq!(updated, 1);
    assert!(texture(&scene, handle).is_loaded());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn content_configs_deserialize_with_defaults() {
    let json = r#"[
        {"kind": "empty"},
        {"kind": "sprite_sheet", "columns": 4, "rows": 2, "fps": 8.0},
        {"kind": "particles", "rate": 5.0, "seed": 7},
        {"kind": "grid", "spacing": 25.0},
        {"kind": "texture", "url": "tiles.png", "size": [64.0, 64.0]}
    ]"#;
    let configs: Vec<ContentConfig> = serde_json::from_str(json).unwrap();
    let contents: Vec<Content> = configs.into_iter().map(Content::from).collect();

    let kinds: Vec<&str> = contents.iter().map(Content::kind).collect();
    assert_eq!(kinds, vec!["empty", "sprite_sheet", "particles", "grid", "texture"]);

    match &contents[1] {
        Content::SpriteSheet(sheet) => {
            assert_eq!(sheet.frame_count(), 8);
            assert!(sheet.config().looping);
        }
        other => panic!("unexpected {}", other.kind()),
    }
    match &contents[2] {
        Content::Particles(emitter) => {
            assert_eq!(emitter.config().seed, 7);
            assert_eq!(emitter.config().max_particles, 256);
        }
        other => panic!("unexpected {}", other.kind()),
    }
    match &contents[3] {
        Content::Grid(grid) => assert_eq!(grid.config().size, Vec2::splat(100.0)),
        other => panic!("unexpected {}", other.kind()),
    }
}
