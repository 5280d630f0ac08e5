//! Scene Dump
//!
//! Builds a scene from a JSON description, runs it for a number of frames
//! and prints the final draw list, debug overlays and query results.
//!
//! ```text
//! cargo run -p scene_dump -- [scene.json] [--realtime]
//! ```
//!
//! Without a path the bundled `scene.json` is used. Frames advance by a
//! fixed step unless `--realtime` is given.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, bail};
use glint::prelude::*;
use glint::scene::{DebugBounds, FrameInfo};
use serde::Deserialize;

const BUNDLED_SCENE: &str = include_str!("scene.json");

#[derive(Debug, Deserialize)]
struct SceneDescription {
    #[serde(default)]
    settings: SceneSettings,
    #[serde(default = "default_frames")]
    frames: u32,
    #[serde(default = "default_fps")]
    fps: f32,
    #[serde(default)]
    queries: Vec<String>,
    nodes: Vec<NodeDescription>,
}

fn default_frames() -> u32 {
    60
}

fn default_fps() -> f32 {
    60.0
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct NodeDescription {
    name: String,
    position: Vec2,
    rotation: f32,
    scale: Vec2,
    anchor: Vec2,
    tint: Vec3,
    alpha: f32,
    visible: bool,
    content: ContentConfig,
    properties: BTreeMap<String, PropertyValue>,
    children: Vec<NodeDescription>,
}

impl Default for NodeDescription {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            anchor: Vec2::ZERO,
            tint: Vec3::ONE,
            alpha: 1.0,
            visible: true,
            content: ContentConfig::Empty,
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

fn spawn(scene: &mut Scene, parent: NodeHandle, desc: NodeDescription) -> anyhow::Result<()> {
    let mut builder = scene
        .build_node(&desc.name)
        .with_position(desc.position.x, desc.position.y)
        .with_rotation(desc.rotation)
        .with_scale(desc.scale.x, desc.scale.y)
        .with_anchor(desc.anchor.x, desc.anchor.y)
        .with_tint(desc.tint)
        .with_alpha(desc.alpha)
        .with_visible(desc.visible)
        .with_content(desc.content)
        .with_parent(parent);
    for (key, value) in desc.properties {
        builder = builder.with_property(&key, value);
    }

    let handle = builder
        .build()
        .with_context(|| format!("attaching node {:?}", desc.name))?;

    for child in desc.children {
        spawn(scene, handle, child)?;
    }
    Ok(())
}

/// Completes every request on the next poll with a fresh texture handle.
#[derive(Default)]
struct InstantLoader {
    next: u32,
    completed: Vec<LoadEvent>,
}

impl ResourceLoader for InstantLoader {
    fn start_load(&mut self, url: &str) {
        self.next += 1;
        log::info!("Loading {url} as texture #{}", self.next);
        self.completed.push(LoadEvent::loaded(url, TextureHandle(self.next)));
    }

    fn poll(&mut self) -> Vec<LoadEvent> {
        std::mem::take(&mut self.completed)
    }
}

/// Prints every draw call.
struct TextBackend<'a> {
    scene: &'a Scene,
}

impl RenderBackend for TextBackend<'_> {
    fn begin_frame(&mut self, frame: &FrameInfo) {
        println!("== frame {} (dt {:.4}s) ==", frame.frame, frame.dt);
    }

    fn draw(&mut self, item: &DrawItem, content: &Content) {
        let name = self.scene.node(item.handle).map_or("?", |n| n.name.as_str());
        let origin = item.world.transform_point3(Vec3::ZERO);
        let detail = match content {
            Content::SpriteSheet(sheet) => format!(" frame {}", sheet.current_frame()),
            Content::Particles(emitter) => format!(" {} particles", emitter.particles().len()),
            Content::Texture(texture) => format!(" {:?}", texture.state),
            _ => String::new(),
        };
        println!(
            "  depth {:>8.4}  {:<10} {:<12} at ({:>7.2}, {:>7.2})  tint {:?}  alpha {:.2}{detail}",
            item.depth,
            name,
            content.kind(),
            origin.x,
            origin.y,
            item.tint.to_array(),
            item.alpha,
        );
    }

    fn draw_debug_bounds(&mut self, bounds: &DebugBounds) {
        println!(
            "  bounds {:?}: ({:.1}, {:.1}) .. ({:.1}, {:.1})",
            bounds.handle, bounds.rect.min.x, bounds.rect.min.y, bounds.rect.max.x, bounds.rect.max.y
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut path = None;
    let mut realtime = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--realtime" => realtime = true,
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            _ => path = Some(arg),
        }
    }

    let text = match &path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => BUNDLED_SCENE.to_owned(),
    };
    let description: SceneDescription =
        serde_json::from_str(&text).context("parsing scene description")?;

    let mut scene = Scene::with_settings(description.settings);
    let root = scene.root();
    for node in description.nodes {
        spawn(&mut scene, root, node)?;
    }
    log::info!("Built {} attached nodes", scene.registry().len());

    let mut loader = InstantLoader::default();
    scene.request_textures(&mut loader);

    let step = Duration::from_secs_f32(1.0 / description.fps.max(1.0));
    let mut timer = Timer::new();
    for _ in 0..description.frames {
        if realtime {
            std::thread::sleep(step);
            timer.tick();
        } else {
            timer.advance(step);
        }
        scene.pump_loads(&mut loader);
        scene.update(timer.dt_seconds());
    }
    log::info!(
        "Ran {} frames over {:.3}s",
        timer.frame_count,
        timer.elapsed.as_secs_f32()
    );

    let output = scene.frame_output();
    if output.depth_underflow {
        log::warn!("Depth budget exhausted; raise settings.max_depth");
    }
    scene.render(&mut TextBackend { scene: &scene });

    for query in &description.queries {
        let found = scene.find(Some(query.as_str()))?;
        let names: Vec<&str> = found
            .iter()
            .filter_map(|&h| scene.node(h).map(|n| n.name.as_str()))
            .collect();
        println!("find({query:?}) -> {names:?}");
    }

    Ok(())
}
