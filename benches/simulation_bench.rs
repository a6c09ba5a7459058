use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use glam::{Mat4, Quat, Vec2, Vec3};
use hayloft::animation::tracks::{InterpolationMode, KeyframeTrack};
use hayloft::animation::{AnimationClip, AnimationLibrary, AnimationState, Animator, BoneTracks};
use hayloft::input::ActionKind;
use hayloft::physics::{CollisionMap, PhysicsBody, SlideSolver};
use hayloft::scene::{Bone, Skeleton};
use hayloft::settings::{EngineSettings, SolverSettings};
use hayloft::simulation::Simulation;

const BONES: usize = 48;

/// A branching skeleton: a spine with a short limb hanging off every
/// third bone.
fn create_skeleton() -> Skeleton {
    let bones = (0..BONES)
        .map(|i| Bone {
            name: format!("bone_{i}"),
            parent: match i {
                0 => None,
                i if i % 3 == 0 => Some(i - 3),
                i => Some(i - 1),
            },
        })
        .collect();
    let locals = (0..BONES)
        .map(|i| Mat4::from_translation(Vec3::new(0.0, 0.1, 0.0) * i as f32))
        .collect();
    Skeleton::new("bench", bones, locals, vec![Mat4::IDENTITY; BONES]).unwrap()
}

fn create_clip(name: &str, keys: usize) -> AnimationClip {
    let times: Vec<f32> = (0..keys).map(|k| k as f32 / 30.0).collect();
    let bones = (0..BONES)
        .map(|b| {
            let rotations = times
                .iter()
                .map(|&t| Quat::from_rotation_z((t * 3.0 + b as f32).sin() * 0.4))
                .collect();
            let positions = times
                .iter()
                .map(|&t| Vec3::new(0.0, 0.1 + t.sin() * 0.01, 0.0))
                .collect();
            BoneTracks {
                rotation: KeyframeTrack::new(times.clone(), rotations, InterpolationMode::Linear)
                    .unwrap(),
                position: KeyframeTrack::new(times.clone(), positions, InterpolationMode::Linear)
                    .unwrap(),
                ..BoneTracks::default()
            }
        })
        .collect();
    AnimationClip::new(name, bones)
}

fn create_simulation() -> Simulation {
    let skeleton = create_skeleton();
    let mut library = AnimationLibrary::new();
    library.insert(create_clip("idle", 60));
    library.insert(create_clip("walk", 30));

    let settings = EngineSettings::default();
    let mut animator =
        Animator::new(&skeleton, library, AnimationState::Idle, settings.blend).unwrap();
    animator.bind_state(AnimationState::Idle, "idle").unwrap();
    animator.bind_state(AnimationState::Walk, "walk").unwrap();

    let map = CollisionMap::from_rows(&[
        "#..................#",
        "#..................#",
        "#....##............#",
        "#.........P........#",
        "####################",
    ])
    .unwrap();
    Simulation::new(settings, map, skeleton, animator).unwrap()
}

fn animation_benchmark(c: &mut Criterion) {
    let mut skeleton = create_skeleton();
    let clip = std::sync::Arc::new(create_clip("walk", 120));
    let mut playback = hayloft::animation::Playback::new(clip);

    c.bench_function("playback_seek_120_keys", |b| {
        b.iter(|| {
            playback.seek(black_box(3.9));
        });
    });

    c.bench_function("hierarchy_evaluate_48_bones", |b| {
        b.iter(|| {
            skeleton.compute_global_poses(black_box(Mat4::IDENTITY));
            skeleton.compute_skinning_matrices();
        });
    });
}

fn solver_benchmark(c: &mut Criterion) {
    let map = CollisionMap::from_rows(&["...#", "...#", "...#", "####"]).unwrap();
    let solver = SlideSolver::new(SolverSettings::default());

    c.bench_function("slide_corner", |b| {
        b.iter(|| {
            let mut body = PhysicsBody::with_size(Vec2::new(2.45, 1.55), Vec2::ONE);
            black_box(solver.solve(&map, &mut body, black_box(Vec2::new(6.0, -6.0)), 1.0 / 60.0))
        });
    });
}

fn simulation_benchmark(c: &mut Criterion) {
    let mut sim = create_simulation();
    let mut frame = 0_u32;

    c.bench_function("simulation_tick", |b| {
        b.iter(|| {
            frame = frame.wrapping_add(1);
            let left = (frame / 90) % 2 == 0;
            sim.actions_mut().set(ActionKind::Left, left);
            sim.actions_mut().set(ActionKind::Right, !left);
            sim.tick();
        });
    });
}

criterion_group!(
    benches,
    animation_benchmark,
    solver_benchmark,
    simulation_benchmark
);
criterion_main!(benches);
