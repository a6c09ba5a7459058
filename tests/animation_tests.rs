//! Animation System Tests
//!
//! Tests for:
//! - KeyframeTrack validation, clamping and single-key behavior
//! - Playback seek / step / looped stepping
//! - Pose blending at the fade endpoints and transition chaining
//! - Binder channel resolution by bone name
//! - Animator state switching

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use hayloft::animation::tracks::{InterpolationMode, KeyframeTrack};
use hayloft::animation::{
    AnimationClip, AnimationLibrary, AnimationState, Animator, Binder, BoneTracks, ImportKey,
    ImportedAnimation, LoopRegion, NodeChannel, Playback, PoseBlender, blend_poses,
};
use hayloft::errors::HayloftError;
use hayloft::scene::{Bone, Skeleton};
use hayloft::settings::BlendSettings;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

fn approx_mat4(a: &Mat4, b: &Mat4) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| approx(*x, *y))
}

/// Root -> bone1 -> bone2, all at rest.
fn chain_skeleton() -> Skeleton {
    let bones = vec![
        Bone { name: "root".into(), parent: None },
        Bone { name: "bone1".into(), parent: Some(0) },
        Bone { name: "bone2".into(), parent: Some(1) },
    ];
    Skeleton::new("chain", bones, vec![Mat4::IDENTITY; 3], vec![Mat4::IDENTITY; 3]).unwrap()
}

/// Bone 1 moves from the origin to (0, 1, 0) over one second.
fn lift_clip() -> AnimationClip {
    let mut bones = vec![BoneTracks::default(); 3];
    bones[1].position = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::Y],
        InterpolationMode::Linear,
    )
    .unwrap();
    AnimationClip::new("lift", bones)
}

/// Bone 1 turns a quarter around Z and shifts along X.
fn turn_clip() -> AnimationClip {
    let mut bones = vec![BoneTracks::default(); 3];
    bones[1].rotation = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)],
        InterpolationMode::Linear,
    )
    .unwrap();
    bones[1].position = KeyframeTrack::constant(Vec3::new(2.0, 0.0, 0.0));
    AnimationClip::new("turn", bones)
}

// ============================================================================
// KeyframeTrack
// ============================================================================

#[test]
fn track_rejects_empty_and_mismatched_keys() {
    assert!(matches!(
        KeyframeTrack::<f32>::new(vec![], vec![], InterpolationMode::Linear),
        Err(HayloftError::EmptyTrack)
    ));
    assert!(matches!(
        KeyframeTrack::new(vec![0.0, 1.0], vec![1.0_f32], InterpolationMode::Linear),
        Err(HayloftError::TrackLengthMismatch { times: 2, values: 1 })
    ));
    assert!(matches!(
        KeyframeTrack::new(vec![0.0, 2.0, 1.0], vec![0.0_f32; 3], InterpolationMode::Linear),
        Err(HayloftError::UnsortedKeys { index: 2, .. })
    ));
}

#[test]
fn track_single_key_returns_value_unchanged() {
    let value = Vec3::new(1.25, -3.0, 7.5);
    let track = KeyframeTrack::new(vec![0.4], vec![value], InterpolationMode::Linear).unwrap();

    for t in [-10.0, 0.0, 0.4, 0.9, 1000.0] {
        assert_eq!(track.sample(t), value, "time {t}");
    }
}

#[test]
fn track_clamps_outside_key_range() {
    let track =
        KeyframeTrack::new(vec![1.0, 2.0], vec![10.0_f32, 20.0], InterpolationMode::Linear).unwrap();
    assert!(approx(track.sample(0.0), 10.0));
    assert!(approx(track.sample(1.5), 15.0));
    assert!(approx(track.sample(5.0), 20.0));
}

#[test]
fn track_step_mode_holds_left_key() {
    let track =
        KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Step).unwrap();
    assert!(approx(track.sample(0.99), 0.0));
    assert!(approx(track.sample(1.0), 10.0));
}

// ============================================================================
// Playback
// ============================================================================

#[test]
fn playback_seek_is_idempotent() {
    let mut playback = Playback::new(Arc::new(turn_clip()));

    playback.seek(0.37);
    let first: Vec<_> = playback.bones().to_vec();
    playback.seek(0.37);
    assert_eq!(playback.bones(), first.as_slice());
}

#[test]
fn playback_step_matches_seek() {
    let clip = Arc::new(lift_clip());
    let mut stepped = Playback::new(Arc::clone(&clip));
    let mut seeked = Playback::new(clip);

    for _ in 0..3 {
        stepped.step(0.25);
    }
    seeked.seek(0.75);

    assert!(approx(stepped.time(), 0.75));
    assert!(approx_vec3(stepped.bones()[1].position, seeked.bones()[1].position));
}

#[test]
fn playback_step_does_not_wrap() {
    let mut playback = Playback::new(Arc::new(lift_clip()));
    playback.step(3.0);
    assert!(approx(playback.time(), 3.0));
    assert!(approx_vec3(playback.bones()[1].position, Vec3::Y));
}

#[test]
fn playback_step_looped_wraps_into_region() {
    let mut playback = Playback::new(Arc::new(lift_clip()));
    let region = LoopRegion::new(0.0, 1.0);

    playback.step_looped(0.75, region);
    playback.step_looped(0.5, region);
    assert!(approx(playback.time(), 0.25));
    assert!(approx_vec3(playback.bones()[1].position, Vec3::new(0.0, 0.25, 0.0)));
}

#[test]
fn playback_composes_translate_rotate_scale() {
    let mut bones = vec![BoneTracks::default()];
    bones[0].position = KeyframeTrack::constant(Vec3::new(1.0, 0.0, 0.0));
    bones[0].scale = KeyframeTrack::constant(Vec3::splat(2.0));
    bones[0].rotation = KeyframeTrack::constant(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
    let playback = Playback::new(Arc::new(AnimationClip::new("trs", bones)));

    // (1,0,0) scaled to (2,0,0), rotated to (0,2,0), moved to (1,2,0)
    let p = playback.bones()[0].local_matrix().transform_point3(Vec3::X);
    assert!(approx_vec3(p, Vec3::new(1.0, 2.0, 0.0)), "got {p}");
}

#[test]
fn scenario_three_bone_lift() {
    let mut skeleton = chain_skeleton();
    let mut playback = Playback::new(Arc::new(lift_clip()));

    playback.seek(0.5);
    assert!(approx_vec3(playback.bones()[1].position, Vec3::new(0.0, 0.5, 0.0)));

    playback.apply(&mut skeleton);
    skeleton.compute_global_poses(Mat4::IDENTITY);

    let global = skeleton.global_pose(1).unwrap();
    assert!(approx_vec3(global.w_axis.truncate(), Vec3::new(0.0, 0.5, 0.0)));
}

// ============================================================================
// Pose Blending
// ============================================================================

#[test]
fn blend_endpoints_reproduce_each_playback() {
    let mut previous = Playback::new(Arc::new(lift_clip()));
    let mut current = Playback::new(Arc::new(turn_clip()));
    previous.seek(0.3);
    current.seek(0.6);

    let mut out = vec![Mat4::ZERO; 3];

    assert_eq!(blend_poses(&previous, &current, 0.0, &mut out), 0);
    for (pose, bone) in out.iter().zip(previous.bones()) {
        assert!(approx_mat4(pose, &bone.local_matrix()));
    }

    assert_eq!(blend_poses(&previous, &current, 1.0, &mut out), 0);
    for (pose, bone) in out.iter().zip(current.bones()) {
        assert!(approx_mat4(pose, &bone.local_matrix()));
    }
}

#[test]
fn blend_midpoint_lerps_position() {
    let mut previous = Playback::new(Arc::new(lift_clip()));
    previous.seek(1.0);
    let current = Playback::new(Arc::new(turn_clip()));

    let mut out = vec![Mat4::ZERO; 3];
    blend_poses(&previous, &current, 0.5, &mut out);

    // (0,1,0) and (2,0,0) meet halfway
    assert!(approx_vec3(out[1].w_axis.truncate(), Vec3::new(1.0, 0.5, 0.0)));
}

#[test]
fn blender_fade_advances_and_saturates() {
    let settings = BlendSettings { rate: 4.0, nearly_complete: 0.9 };
    let mut blender = PoseBlender::new(Arc::new(lift_clip()), settings);
    assert!(approx(blender.factor(), 1.0));

    blender.transition(Arc::new(turn_clip()));
    assert!(approx(blender.factor(), 0.0));
    assert_eq!(blender.previous().clip().name, "lift");
    assert_eq!(blender.current().clip().name, "turn");

    blender.advance(0.125);
    assert!(approx(blender.factor(), 0.5));
    blender.advance(10.0);
    assert!(approx(blender.factor(), 1.0));
}

#[test]
fn blender_interrupted_fade_keeps_source() {
    let settings = BlendSettings::default();
    let mut blender = PoseBlender::new(Arc::new(lift_clip()), settings);

    blender.transition(Arc::new(turn_clip()));
    blender.advance(0.05);
    let factor = blender.factor();
    assert!(!blender.is_nearly_complete());

    let idle = AnimationClip::rest("idle", 3);
    blender.transition(Arc::new(idle));

    assert_eq!(blender.previous().clip().name, "lift");
    assert_eq!(blender.current().clip().name, "idle");
    assert!(approx(blender.factor(), factor));
}

// ============================================================================
// Binder
// ============================================================================

#[test]
fn binder_maps_channels_by_bone_name() {
    let skeleton = chain_skeleton();
    let animation = ImportedAnimation {
        name: "imported".into(),
        ticks_per_second: 24.0,
        channels: vec![
            NodeChannel {
                node_name: "bone2".into(),
                position_keys: vec![
                    ImportKey { tick: 0.0, value: Vec3::ZERO },
                    ImportKey { tick: 48.0, value: Vec3::new(4.0, 0.0, 0.0) },
                ],
                ..NodeChannel::default()
            },
            NodeChannel {
                node_name: "tail".into(),
                position_keys: vec![ImportKey { tick: 0.0, value: Vec3::ONE }],
                ..NodeChannel::default()
            },
        ],
    };

    let clip = Binder::bind(&skeleton, &animation).unwrap();
    assert_eq!(clip.bone_count(), 3);
    assert!(approx(clip.duration, 2.0));

    let bone2 = clip.bone(2).unwrap();
    assert!(approx_vec3(bone2.position.sample(1.0), Vec3::new(2.0, 0.0, 0.0)));
    // Missing tracks fall back to rest keys
    assert_eq!(bone2.scale.sample(1.0), Vec3::ONE);
    assert_eq!(clip.bone(0).unwrap().position.sample(1.0), Vec3::ZERO);
}

// ============================================================================
// Animator
// ============================================================================

#[test]
fn animator_switches_clips_by_state() {
    let mut skeleton = chain_skeleton();
    let mut library = AnimationLibrary::new();
    library.insert(lift_clip());
    library.insert(turn_clip());

    let mut animator =
        Animator::new(&skeleton, library, AnimationState::Idle, BlendSettings::default()).unwrap();
    animator.bind_state(AnimationState::Idle, "lift").unwrap();
    animator.bind_state(AnimationState::Walk, "turn").unwrap();
    assert!(matches!(
        animator.bind_state(AnimationState::Jump, "missing"),
        Err(HayloftError::UnknownClip(_))
    ));

    assert_eq!(animator.blender().current().clip().name, "lift");
    assert!(animator.set_state(AnimationState::Walk));
    assert!(!animator.set_state(AnimationState::Walk));
    assert_eq!(animator.blender().current().clip().name, "turn");

    for _ in 0..60 {
        animator.update(1.0 / 60.0);
    }
    assert!(approx(animator.blender().factor(), 1.0));

    assert_eq!(animator.apply(&mut skeleton), 0);
    let expected = animator.blender().current().bones()[1].local_matrix();
    assert!(approx_mat4(&skeleton.local_poses()[1], &expected));
}

#[test]
fn animator_rejects_clip_for_other_skeleton() {
    let skeleton = chain_skeleton();
    let mut library = AnimationLibrary::new();
    library.insert(AnimationClip::rest("tiny", 1));

    assert!(matches!(
        Animator::new(&skeleton, library, AnimationState::Idle, BlendSettings::default()),
        Err(HayloftError::BoneCountMismatch { expected: 3, found: 1, .. })
    ));
}
