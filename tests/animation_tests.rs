//! Animation System Tests
//!
//! Tests for:
//! - AnimationTrack boundary clamping and per-mode interpolation
//! - Interpolatable implementations (f32, Vec3, Quat)
//! - Automatic and locked tangents
//! - AnimationClip sampling, muting, duration and events
//! - AnimationPlayer transport (play/pause/seek/step) and event reporting

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec2, Vec3};

use sinew::animation::easing;
use sinew::{
    AnimationClip, AnimationPlayer, AnimationTrack, BlendShapeWeights, InterpolationMode, Keyframe,
    LoopMode, Skeleton, TargetPath,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

const ALL_MODES: [InterpolationMode; 11] = [
    InterpolationMode::Constant,
    InterpolationMode::Linear,
    InterpolationMode::EaseIn,
    InterpolationMode::EaseOut,
    InterpolationMode::EaseInOut,
    InterpolationMode::Bounce,
    InterpolationMode::Elastic,
    InterpolationMode::Back,
    InterpolationMode::Hermite,
    InterpolationMode::CatmullRom,
    InterpolationMode::Bezier,
];

fn scalar_track(mode: InterpolationMode, keys: &[(f32, f32)]) -> AnimationTrack<f32> {
    let mut track = AnimationTrack::new("value");
    for &(time, value) in keys {
        track.add_keyframe(time, value, mode);
    }
    track
}

// ============================================================================
// AnimationTrack: Boundaries
// ============================================================================

#[test]
fn empty_track_evaluates_to_default() {
    let track = AnimationTrack::<f32>::new("empty");
    assert_eq!(track.evaluate(0.5), 0.0);

    let rotation = AnimationTrack::<Quat>::new("empty");
    assert_eq!(rotation.evaluate(0.5), Quat::IDENTITY);
}

#[test]
fn single_keyframe_is_constant_everywhere() {
    let track = scalar_track(InterpolationMode::Linear, &[(1.0, 7.0)]);
    assert_eq!(track.evaluate(-5.0), 7.0);
    assert_eq!(track.evaluate(1.0), 7.0);
    assert_eq!(track.evaluate(100.0), 7.0);
}

#[test]
fn boundaries_clamp_for_every_mode() {
    for mode in ALL_MODES {
        let track = scalar_track(mode, &[(1.0, 10.0), (2.0, -3.0), (3.0, 20.0)]);
        assert_eq!(track.evaluate(0.0), 10.0, "{mode:?} before first");
        assert_eq!(track.evaluate(1.0), 10.0, "{mode:?} at first");
        assert_eq!(track.evaluate(3.0), 20.0, "{mode:?} at last");
        assert_eq!(track.evaluate(9.0), 20.0, "{mode:?} after last");
    }
}

#[test]
fn nan_time_yields_first_value() {
    let track = scalar_track(InterpolationMode::Linear, &[(0.0, 1.0), (1.0, 2.0)]);
    assert_eq!(track.evaluate(f32::NAN), 1.0);
}

#[test]
fn keyframes_stay_sorted_and_unique() {
    let mut track = AnimationTrack::new("value");
    track.add_keyframe(2.0, 2.0_f32, InterpolationMode::Linear);
    track.add_keyframe(0.0, 0.0, InterpolationMode::Linear);
    track.add_keyframe(1.0, 1.0, InterpolationMode::Linear);
    track.add_keyframe(1.0, 5.0, InterpolationMode::Linear);

    let times: Vec<f32> = track.keyframes().iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0]);
    assert_eq!(track.keyframes()[1].value, 5.0);
    assert_eq!(track.start_time(), 0.0);
    assert_eq!(track.end_time(), 2.0);
}

#[test]
fn remove_keyframe_out_of_range_is_none() {
    let mut track = scalar_track(InterpolationMode::Linear, &[(0.0, 0.0), (1.0, 1.0)]);
    assert!(track.remove_keyframe(5).is_none());
    assert_eq!(track.remove_keyframe(0).map(|k| k.value), Some(0.0));
    assert_eq!(track.len(), 1);
}

// ============================================================================
// AnimationTrack: Interpolation Modes
// ============================================================================

#[test]
fn linear_f32_midpoint() {
    let track = scalar_track(InterpolationMode::Linear, &[(0.0, 0.0), (1.0, 10.0)]);
    assert!(approx(track.evaluate(0.5), 5.0));
    assert!(approx(track.evaluate(0.25), 2.5));
}

#[test]
fn constant_holds_start_value_for_whole_segment() {
    let track = scalar_track(InterpolationMode::Constant, &[(0.0, 1.0), (1.0, 9.0)]);
    for t in [0.0, 0.1, 0.5, 0.9, 0.999] {
        assert_eq!(track.evaluate(t), 1.0, "t = {t}");
    }
    assert_eq!(track.evaluate(1.0), 9.0);
}

#[test]
fn segment_mode_comes_from_start_keyframe() {
    let mut track = AnimationTrack::new("mixed");
    track.add_keyframe(0.0, 0.0_f32, InterpolationMode::Constant);
    track.add_keyframe(1.0, 10.0, InterpolationMode::Linear);
    track.add_keyframe(2.0, 20.0, InterpolationMode::Constant);

    assert_eq!(track.evaluate(0.5), 0.0);
    assert!(approx(track.evaluate(1.5), 15.0));
}

#[test]
fn ease_modes_match_their_curves() {
    let cases = [
        (InterpolationMode::EaseIn, easing::ease_in(0.3)),
        (InterpolationMode::EaseOut, easing::ease_out(0.3)),
        (InterpolationMode::EaseInOut, easing::ease_in_out(0.3)),
        (InterpolationMode::Bounce, easing::bounce(0.3)),
        (InterpolationMode::Elastic, easing::elastic(0.3)),
        (InterpolationMode::Back, easing::back(0.3)),
    ];
    for (mode, expected) in cases {
        let track = scalar_track(mode, &[(0.0, 0.0), (1.0, 1.0)]);
        assert!(approx(track.evaluate(0.3), expected), "{mode:?}");
    }
}

#[test]
fn easing_curves_hit_endpoints() {
    for f in [
        easing::ease_in,
        easing::ease_out,
        easing::ease_in_out,
        easing::bounce,
        easing::back,
    ] {
        assert!(approx(f(0.0), 0.0));
        assert!(approx(f(1.0), 1.0));
    }
    assert!(approx(easing::elastic(1.0), 1.0));
}

#[test]
fn back_overshoots() {
    let peak = (1..100)
        .map(|i| easing::back(i as f32 / 100.0))
        .fold(f32::MIN, f32::max);
    assert!(peak > 1.0);
}

#[test]
fn hermite_with_flat_tangents_is_smoothstep() {
    let mut track = AnimationTrack::from_keyframes(
        "value",
        [
            Keyframe::new(0.0, 0.0_f32, InterpolationMode::Hermite).with_tangents(0.0, 0.0),
            Keyframe::new(1.0, 1.0_f32, InterpolationMode::Hermite).with_tangents(0.0, 0.0),
        ],
    );
    // Locked tangents survive recomputation.
    track.compute_tangents();

    let t: f32 = 0.25;
    let smoothstep = t * t * (3.0 - 2.0 * t);
    assert!(approx(track.evaluate(t), smoothstep));
    assert!(approx(track.evaluate(0.5), 0.5));
}

#[test]
fn catmull_rom_passes_through_keys_and_is_smooth() {
    let track = scalar_track(
        InterpolationMode::CatmullRom,
        &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)],
    );
    assert!(approx(track.evaluate(1.0), 1.0));
    assert!(approx(track.evaluate(2.0), 0.0));

    // Interior tangent at t=1 is (0 - 0) / 2 = 0, so the curve peaks there.
    assert!(track.evaluate(0.9) < 1.0);
    assert!(track.evaluate(1.1) < 1.0);
}

#[test]
fn automatic_tangents_follow_neighbours() {
    let track = scalar_track(
        InterpolationMode::CatmullRom,
        &[(0.0, 0.0), (1.0, 2.0), (2.0, 6.0)],
    );
    let keys = track.keyframes();
    assert!(approx(keys[0].out_tangent, 2.0));
    assert!(approx(keys[1].out_tangent, 3.0));
    assert!(approx(keys[2].in_tangent, 4.0));
}

#[test]
fn set_tangents_locks_them() {
    let mut track = scalar_track(InterpolationMode::Hermite, &[(0.0, 0.0), (1.0, 1.0)]);
    track.set_tangents(0, 5.0, 5.0);
    track.add_keyframe(2.0, 0.0, InterpolationMode::Hermite);

    assert!(track.keyframes()[0].tangents_locked);
    assert_eq!(track.keyframes()[0].out_tangent, 5.0);
}

#[test]
fn bezier_with_linear_handles_is_linear() {
    let track = AnimationTrack::from_keyframes(
        "value",
        [
            Keyframe::new(0.0, 0.0_f32, InterpolationMode::Bezier)
                .with_handles(Vec2::ZERO, Vec2::ZERO),
            Keyframe::new(1.0, 10.0_f32, InterpolationMode::Bezier)
                .with_handles(Vec2::ONE, Vec2::ONE),
        ],
    );
    assert!(approx(track.evaluate(0.5), 5.0));
}

#[test]
fn bezier_ease_in_handles_lag_behind_linear() {
    let track = AnimationTrack::from_keyframes(
        "value",
        [
            Keyframe::new(0.0, 0.0_f32, InterpolationMode::Bezier)
                .with_handles(Vec2::ZERO, Vec2::new(0.42, 0.0)),
            Keyframe::new(1.0, 1.0_f32, InterpolationMode::Bezier)
                .with_handles(Vec2::ONE, Vec2::ONE),
        ],
    );
    let v = track.evaluate(0.25);
    assert!(v > 0.0 && v < 0.25, "got {v}");
}

#[test]
fn vec3_linear_interpolation() {
    let mut track = AnimationTrack::new("pos");
    track.add_keyframe(0.0, Vec3::ZERO, InterpolationMode::Linear);
    track.add_keyframe(2.0, Vec3::new(2.0, 4.0, -2.0), InterpolationMode::Linear);
    assert!(track.evaluate(1.0).abs_diff_eq(Vec3::new(1.0, 2.0, -1.0), EPSILON));
}

#[test]
fn quat_slerp_never_denormalizes() {
    let pairs = [
        (Quat::IDENTITY, Quat::from_rotation_y(3.0)),
        (Quat::from_rotation_x(0.7), Quat::from_rotation_z(-2.5)),
        (
            Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 1.2),
            Quat::from_rotation_y(-3.1),
        ),
    ];
    for (a, b) in pairs {
        for mode in [
            InterpolationMode::Linear,
            InterpolationMode::EaseInOut,
            InterpolationMode::Hermite,
            InterpolationMode::Back,
        ] {
            let mut track = AnimationTrack::new("rot");
            track.add_keyframe(0.0, a, mode);
            track.add_keyframe(1.0, b, mode);
            for i in 0..=20 {
                let q = track.evaluate(i as f32 / 20.0);
                assert!((q.length() - 1.0).abs() < 1e-4, "{mode:?} |q| = {}", q.length());
            }
        }
    }
}

#[test]
fn quat_slerp_halfway_angle() {
    let mut track = AnimationTrack::new("rot");
    track.add_keyframe(0.0, Quat::IDENTITY, InterpolationMode::Linear);
    track.add_keyframe(1.0, Quat::from_rotation_z(FRAC_PI_2), InterpolationMode::Linear);

    let q = track.evaluate(0.5);
    assert!(q.angle_between(Quat::from_rotation_z(FRAC_PI_2 / 2.0)) < 1e-4);
}

// ============================================================================
// AnimationClip
// ============================================================================

fn arm() -> (Skeleton, usize) {
    let mut skeleton = Skeleton::new("Arm");
    let shoulder = skeleton.add_bone("Shoulder", None).unwrap();
    let elbow = skeleton.add_bone("Elbow", Some(shoulder)).unwrap();
    let wrist = skeleton.add_bone("Wrist", Some(elbow)).unwrap();
    skeleton.set_bone_local_position(elbow, Vec3::X);
    skeleton.set_bone_local_position(wrist, Vec3::X);
    (skeleton, elbow)
}

fn elbow_wave() -> AnimationClip {
    let mut clip = AnimationClip::new("Wave");
    for (time, angle) in [(0.0, 0.0), (0.5, 0.5), (1.0, 0.0)] {
        clip.add_rotation_keyframe(
            "Elbow",
            time,
            Quat::from_rotation_z(angle),
            InterpolationMode::Linear,
        );
    }
    clip
}

#[test]
fn arm_elbow_track_is_symmetric() {
    let mut angle = AnimationTrack::new("Elbow.rotation.z");
    angle.add_keyframe(0.0, 0.0_f32, InterpolationMode::Linear);
    angle.add_keyframe(0.5, 0.5, InterpolationMode::Linear);
    angle.add_keyframe(1.0, 0.0, InterpolationMode::Linear);
    assert!(approx(angle.evaluate(0.25), 0.25));
    assert!(approx(angle.evaluate(0.75), 0.25));

    let clip = elbow_wave();
    let rotation = clip.bone_track("Elbow").and_then(|t| t.rotation.as_ref()).unwrap();
    let expected = Quat::from_rotation_z(0.25);
    assert!(rotation.evaluate(0.25).angle_between(expected) < 1e-4);
    assert!(rotation.evaluate(0.75).angle_between(expected) < 1e-4);
}

#[test]
fn arm_clip_sample_poses_skeleton() -> anyhow::Result<()> {
    let (mut skeleton, elbow) = arm();
    let wrist = skeleton.require_bone("Wrist")?;
    let clip = elbow_wave();

    clip.sample(0.25, &mut skeleton, None);
    assert!(!skeleton.is_dirty());

    let local = skeleton.local_transform(elbow).copied().unwrap_or_default();
    assert!(local.rotation.angle_between(Quat::from_rotation_z(0.25)) < 1e-4);
    // Untouched channels keep their values.
    assert!(local.position.abs_diff_eq(Vec3::X, EPSILON));

    let wrist_pos = skeleton.model_position(wrist).unwrap_or_default();
    let expected = Vec3::X + Quat::from_rotation_z(0.25) * Vec3::X;
    assert!(wrist_pos.abs_diff_eq(expected, 1e-4));
    Ok(())
}

#[test]
fn clip_duration_follows_last_keyframe() {
    let mut clip = elbow_wave();
    assert!(approx(clip.duration(), 1.0));
    clip.add_blend_shape_keyframe("jawOpen", 2.5, 1.0, InterpolationMode::Linear);
    assert!(approx(clip.duration(), 2.5));
}

#[test]
fn clip_skips_bones_missing_from_skeleton() {
    let (mut skeleton, _) = arm();
    let mut clip = elbow_wave();
    clip.add_translation_keyframe("Tail", 0.0, Vec3::Y, InterpolationMode::Linear);

    clip.sample(0.5, &mut skeleton, None);
    assert_eq!(clip.bound_tracks(&skeleton).count(), 1);
}

#[test]
fn muted_track_keeps_current_value() {
    let (mut skeleton, elbow) = arm();
    let mut clip = elbow_wave();
    assert!(clip.set_track_muted("Elbow", TargetPath::Rotation, true));
    assert!(!clip.set_track_muted("Nobody", TargetPath::Rotation, true));

    clip.sample(0.5, &mut skeleton, None);
    assert_eq!(
        skeleton.local_transform(elbow).map(|t| t.rotation),
        Some(Quat::IDENTITY)
    );
}

#[test]
fn clip_writes_blend_shapes() {
    let (mut skeleton, _) = arm();
    let mut clip = AnimationClip::new("Talk");
    clip.add_blend_shape_keyframe("jawOpen", 0.0, 0.0, InterpolationMode::Linear);
    clip.add_blend_shape_keyframe("jawOpen", 1.0, 1.0, InterpolationMode::Linear);

    let mut weights = BlendShapeWeights::default();
    clip.sample(0.5, &mut skeleton, Some(&mut weights));
    assert!(approx(weights["jawOpen"], 0.5));

    clip.set_blend_shape_muted("jawOpen", true);
    weights.clear();
    clip.sample_blend_shapes(0.5, &mut weights);
    assert!(weights.is_empty());
}

#[test]
fn wrap_time_loops_or_clamps() {
    let mut clip = elbow_wave();
    assert!(approx(clip.wrap_time(1.5), 1.0));
    assert!(approx(clip.wrap_time(-1.0), 0.0));

    clip.looping = true;
    assert!(approx(clip.wrap_time(1.25), 0.25));
    assert!(approx(clip.wrap_time(-0.25), 0.75));

    assert_eq!(AnimationClip::new("Empty").wrap_time(3.0), 0.0);
}

#[test]
fn events_sorted_and_queried() {
    let mut clip = elbow_wave();
    clip.add_event(0.8, "release");
    clip.add_event(0.2, "grab");
    clip.add_event(0.2, "grab_sfx");

    let names: Vec<&str> = clip.events().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["grab", "grab_sfx", "release"]);

    assert_eq!(clip.events_at(0.2, 1e-3).len(), 2);
    assert!(clip.events_at(0.5, 1e-3).is_empty());

    let crossed: Vec<&str> = clip
        .events_in_range(0.2, 0.8)
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(crossed, vec!["release"]);
}

// ============================================================================
// AnimationPlayer
// ============================================================================

fn player_with_events(looping: bool) -> AnimationPlayer {
    let mut clip = elbow_wave();
    clip.looping = looping;
    clip.add_event(0.25, "quarter");
    clip.add_event(0.75, "three_quarters");
    AnimationPlayer::new(Arc::new(clip))
}

#[test]
fn player_defaults_from_clip() {
    assert_eq!(player_with_events(true).loop_mode, LoopMode::Loop);
    assert_eq!(player_with_events(false).loop_mode, LoopMode::Once);
}

#[test]
fn paused_player_does_not_advance() {
    let mut player = player_with_events(false);
    assert!(player.update(0.5).is_empty());
    assert_eq!(player.time(), 0.0);
}

#[test]
fn once_stops_at_end_and_reports_events() {
    let mut player = player_with_events(false);
    player.play();

    let fired = player.update(0.5);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].name, "quarter");

    let fired = player.update(2.0);
    assert_eq!(fired.len(), 1);
    assert!(approx(player.time(), 1.0));
    assert!(!player.is_playing());

    // Playing again restarts.
    player.play();
    assert_eq!(player.time(), 0.0);
}

#[test]
fn loop_wraps_and_reports_events_across_the_seam() {
    let mut player = player_with_events(true);
    player.play();
    player.seek(0.5);

    let fired = player.update(0.9);
    let names: Vec<&str> = fired.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["three_quarters", "quarter"]);
    assert!(approx(player.time(), 0.4));
    assert!(player.is_playing());
}

#[test]
fn ping_pong_reflects_at_the_end() {
    let mut player = player_with_events(false);
    player.loop_mode = LoopMode::PingPong;
    player.play();
    player.update(1.25);
    assert!(approx(player.time(), 0.75));
}

#[test]
fn ping_pong_travels_back_to_the_start() {
    let mut player = player_with_events(false);
    player.loop_mode = LoopMode::PingPong;
    player.play();

    let times: Vec<f32> = (0..8)
        .map(|_| {
            player.update(0.3);
            player.time()
        })
        .collect();
    let expected = [0.3, 0.6, 0.9, 0.8, 0.5, 0.2, 0.1, 0.4];
    for (actual, expected) in times.iter().zip(expected) {
        assert!((actual - expected).abs() < 1e-4, "{times:?}");
    }
    assert!(player.is_playing());
}

#[test]
fn ping_pong_reports_events_on_both_legs_of_a_turn() {
    let mut player = player_with_events(false);
    player.loop_mode = LoopMode::PingPong;
    player.play();
    player.seek(0.5);

    // 0.5 -> 1.0 -> 0.2 crosses "three_quarters" going out and back,
    // then "quarter" on the way down.
    let fired = player.update(1.3);
    let names: Vec<&str> = fired.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["three_quarters", "three_quarters", "quarter"]);
    assert!(approx(player.time(), 0.2));

    // Still heading toward the start.
    player.update(0.1);
    assert!(approx(player.time(), 0.1));
}

#[test]
fn event_at_start_fires_on_first_step() {
    let mut clip = elbow_wave();
    clip.add_event(0.0, "start");
    clip.add_event(0.25, "quarter");
    let mut player = AnimationPlayer::new(Arc::new(clip));
    player.play();

    let fired = player.update(0.1);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].name, "start");
    assert!(player.update(0.1).is_empty());

    player.stop();
    player.play();
    let names: Vec<String> = player.update(0.3).into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["start", "quarter"]);

    // After a seek the start is no longer pending.
    player.stop();
    player.play();
    player.seek(0.0);
    assert_eq!(player.update(0.1).len(), 0);
}

#[test]
fn event_at_start_fires_once_on_a_looping_first_step() {
    let mut clip = elbow_wave();
    clip.looping = true;
    clip.add_event(0.0, "start");
    let mut player = AnimationPlayer::new(Arc::new(clip));
    player.play();

    assert_eq!(player.update(0.5).len(), 1);
    assert!(player.update(0.25).is_empty());
    // Crossing the seam fires it again.
    assert_eq!(player.update(0.5).len(), 1);
}

#[test]
fn seek_and_frame_stepping() {
    let mut player = player_with_events(false);
    player.frame_rate = 10.0;
    player.play();

    player.seek(5.0);
    assert!(approx(player.time(), 1.0));

    player.step_frames(-3);
    assert!(!player.is_playing());
    assert!(approx(player.time(), 0.7));
    assert_eq!(player.current_frame(), 7);
    assert_eq!(player.frame_count(), 11);

    player.step_frames(-100);
    assert_eq!(player.time(), 0.0);
}

#[test]
fn stop_rewinds() {
    let mut player = player_with_events(true);
    player.play();
    player.update(0.3);
    player.stop();
    assert_eq!(player.time(), 0.0);
    assert!(!player.is_playing());
}
