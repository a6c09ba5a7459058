//! Headless run of a small level: the player drops onto the floor, walks
//! right into a hay stack, jumps, and the per-frame state is logged.
//!
//! ```text
//! RUST_LOG=debug cargo run --example headless [settings.json]
//! ```

use anyhow::Context;
use glam::{Mat4, Quat, Vec3};

use hayloft::animation::tracks::{InterpolationMode, KeyframeTrack};
use hayloft::animation::{AnimationClip, AnimationLibrary, AnimationState, Animator, BoneTracks};
use hayloft::input::ActionKind;
use hayloft::physics::CollisionMap;
use hayloft::scene::{Skeleton, SkeletonAsset};
use hayloft::settings::EngineSettings;
use hayloft::simulation::Simulation;

const LEVEL: &[&str] = &[
    "#..............#",
    "#..............#",
    "#.........##...#",
    "#..P......##...#",
    "################",
];

fn farmer() -> anyhow::Result<Skeleton> {
    let asset = SkeletonAsset {
        name: "farmer".into(),
        bone_names: ["hips", "spine", "head", "leg_l", "leg_r"]
            .map(String::from)
            .to_vec(),
        parent_indices: vec![-1, 0, 1, 0, 0],
        local_poses: vec![
            Mat4::IDENTITY,
            Mat4::from_translation(Vec3::new(0.0, 0.2, 0.0)),
            Mat4::from_translation(Vec3::new(0.0, 0.2, 0.0)),
            Mat4::from_translation(Vec3::new(-0.1, -0.1, 0.0)),
            Mat4::from_translation(Vec3::new(0.1, -0.1, 0.0)),
        ],
        inverse_bind_matrices: vec![Mat4::IDENTITY; 5],
    };
    Skeleton::from_asset(&asset).context("building farmer skeleton")
}

/// Legs swing in opposite phase; `swing` is the peak angle in radians.
fn gait(name: &str, swing: f32, period: f32) -> anyhow::Result<AnimationClip> {
    let times = vec![0.0, period * 0.5, period];
    let swing_track = |sign: f32| {
        KeyframeTrack::new(
            times.clone(),
            vec![
                Quat::from_rotation_x(sign * swing),
                Quat::from_rotation_x(-sign * swing),
                Quat::from_rotation_x(sign * swing),
            ],
            InterpolationMode::Linear,
        )
    };

    let mut bones = vec![BoneTracks::default(); 5];
    for (bone, offset) in [(1, 0.2), (2, 0.2)] {
        bones[bone].position = KeyframeTrack::constant(Vec3::new(0.0, offset, 0.0));
    }
    bones[3].position = KeyframeTrack::constant(Vec3::new(-0.1, -0.1, 0.0));
    bones[3].rotation = swing_track(1.0)?;
    bones[4].position = KeyframeTrack::constant(Vec3::new(0.1, -0.1, 0.0));
    bones[4].rotation = swing_track(-1.0)?;

    Ok(AnimationClip::new(name, bones))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => {
            let source =
                std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            EngineSettings::from_json(&source)?
        }
        None => EngineSettings::default(),
    };

    let skeleton = farmer()?;
    let mut library = AnimationLibrary::new();
    library.insert(gait("idle", 0.0, 1.0)?);
    library.insert(gait("walk", 0.6, 0.8)?);
    library.insert(gait("air", 0.25, 0.4)?);

    let mut animator = Animator::new(&skeleton, library, AnimationState::Idle, settings.blend)?;
    animator.bind_state(AnimationState::Idle, "idle")?;
    animator.bind_state(AnimationState::Walk, "walk")?;
    animator.bind_state(AnimationState::Jump, "air")?;
    animator.bind_state(AnimationState::Fall, "air")?;

    let map = CollisionMap::from_rows(LEVEL)?;
    let mut sim = Simulation::new(settings, map, skeleton, animator)?;

    // Uneven frame times, as a real host would see them
    let frame_times = [1.0 / 60.0, 1.0 / 45.0, 1.0 / 90.0, 1.0 / 30.0];

    for frame in 0..240_u32 {
        let actions = sim.actions_mut();
        actions.set(ActionKind::Right, (30..150).contains(&frame));
        actions.set(ActionKind::Jump, (100..104).contains(&frame));

        let ticks = sim.frame(frame_times[frame as usize % frame_times.len()]);

        if frame % 20 == 0 {
            let player = sim.player();
            log::info!(
                "frame {frame:3} ticks {ticks} pos {:.3} vel {:.3} floor {} state {:?} blend {:.2}",
                player.body.position,
                player.body.velocity,
                player.body.on_floor(),
                player.animator.state(),
                player.animator.blender().factor(),
            );
        }
    }

    let player = sim.player();
    log::info!(
        "Finished after {} ticks; {} joint floats ready for upload",
        sim.timestep().ticks(),
        player.skeleton.joint_texture_data().len()
    );
    Ok(())
}
