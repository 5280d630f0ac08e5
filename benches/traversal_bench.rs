//! Traversal and query benchmarks.
//!
//! Builds a balanced tree and measures one full traversal, a recursive
//! name query and a recursive property query against it.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glint::core::NodeHandle;
use glint::scene::Scene;

/// A tree with `fanout` children per node, `levels` deep below the root.
fn balanced_scene(fanout: usize, levels: usize) -> Scene {
    let mut scene = Scene::new();
    let mut frontier = vec![scene.root()];

    for level in 0..levels {
        let mut next: Vec<NodeHandle> = Vec::with_capacity(frontier.len() * fanout);
        for &parent in &frontier {
            for i in 0..fanout {
                let child = scene
                    .build_node(&format!("n{level}_{i}"))
                    .with_position(i as f32, level as f32)
                    .with_rotation(0.01 * i as f32)
                    .with_alpha(0.99)
                    .with_property("slot", i as u32)
                    .with_parent(parent)
                    .build()
                    .expect("attach under a fresh parent");
                next.push(child);
            }
        }
        frontier = next;
    }
    scene
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");
    for (fanout, levels) in [(4, 4), (8, 4), (4, 7)] {
        let mut scene = balanced_scene(fanout, levels);
        let nodes = scene.registry().len();
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &nodes, |b, _| {
            b.iter(|| black_box(scene.traverse().draw_list.len()));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let scene = balanced_scene(6, 5);

    c.bench_function("query/recursive_name", |b| {
        b.iter(|| black_box(scene.find(Some(black_box("..n4_3"))).map(|r| r.len())));
    });
    c.bench_function("query/recursive_property", |b| {
        b.iter(|| black_box(scene.find(Some(black_box("..(@slot==2)"))).map(|r| r.len())));
    });
    c.bench_function("query/shallow_chain", |b| {
        b.iter(|| {
            black_box(
                scene
                    .find(Some(black_box("n0_1.n1_2.n2_3.n3_4.n4_5")))
                    .map(|r| r.len()),
            )
        });
    });
}

criterion_group!(benches, bench_traversal, bench_query);
criterion_main!(benches);
