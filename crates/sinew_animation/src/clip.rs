use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use sinew_rig::{BlendShapeWeights, Pose, Skeleton, Transform};

use crate::easing::InterpolationMode;
use crate::tracks::AnimationTrack;

/// Which local-transform channel of a bone a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation, // Maps to Transform.position
    Rotation,    // Maps to Transform.rotation
    Scale,       // Maps to Transform.scale
}

impl TargetPath {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        }
    }
}

/// A named marker on the clip timeline, for gameplay/UI callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationEvent {
    pub time: f32,
    pub name: String,
}

/// The channel tracks that animate one bone.
#[derive(Debug, Clone, Default)]
pub struct BoneTracks {
    pub bone_name: String,
    pub translation: Option<AnimationTrack<Vec3>>,
    pub rotation: Option<AnimationTrack<Quat>>,
    pub scale: Option<AnimationTrack<Vec3>>,
}

impl BoneTracks {
    #[must_use]
    pub fn new(bone_name: &str) -> Self {
        Self {
            bone_name: bone_name.to_string(),
            ..Default::default()
        }
    }

    /// Last keyframe time over all channels.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        let t = self.translation.as_ref().map_or(0.0, AnimationTrack::end_time);
        let r = self.rotation.as_ref().map_or(0.0, AnimationTrack::end_time);
        let s = self.scale.as_ref().map_or(0.0, AnimationTrack::end_time);
        t.max(r).max(s)
    }

    /// Evaluates every unmuted channel at `time` over `base`.
    ///
    /// Channels without a track (or muted) keep the base value.
    #[must_use]
    pub fn sample(&self, time: f32, base: Transform) -> Transform {
        let mut out = base;
        if let Some(track) = self.translation.as_ref().filter(|t| !t.muted) {
            out.position = track.evaluate(time);
        }
        if let Some(track) = self.rotation.as_ref().filter(|t| !t.muted) {
            out.rotation = track.evaluate(time);
        }
        if let Some(track) = self.scale.as_ref().filter(|t| !t.muted) {
            out.scale = track.evaluate(time);
        }
        out
    }

    fn set_muted(&mut self, path: TargetPath, muted: bool) -> bool {
        let flag = match path {
            TargetPath::Translation => self.translation.as_mut().map(|t| &mut t.muted),
            TargetPath::Rotation => self.rotation.as_mut().map(|t| &mut t.muted),
            TargetPath::Scale => self.scale.as_mut().map(|t| &mut t.muted),
        };
        match flag {
            Some(flag) => {
                *flag = muted;
                true
            }
            None => false,
        }
    }
}

/// Named collection of bone channel tracks, blend-shape tracks and events.
///
/// The duration is the last keyframe time over all tracks and is kept up to
/// date by every editing method.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub looping: bool,

    duration: f32,
    bone_tracks: Vec<BoneTracks>,
    bone_lookup: FxHashMap<String, usize>,
    blend_shape_tracks: Vec<AnimationTrack<f32>>,
    /// Sorted by time; equal times keep insertion order.
    events: Vec<AnimationEvent>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            looping: false,
            duration: 0.0,
            bone_tracks: Vec::new(),
            bone_lookup: FxHashMap::default(),
            blend_shape_tracks: Vec::new(),
            events: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn recompute_duration(&mut self) {
        let bones = self
            .bone_tracks
            .iter()
            .map(BoneTracks::end_time)
            .fold(0.0_f32, f32::max);
        let shapes = self
            .blend_shape_tracks
            .iter()
            .map(AnimationTrack::end_time)
            .fold(0.0_f32, f32::max);
        self.duration = bones.max(shapes);
    }

    /// Maps an arbitrary time onto the clip: wraps when looping, clamps otherwise.
    #[must_use]
    pub fn wrap_time(&self, time: f32) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        if self.looping {
            time.rem_euclid(self.duration)
        } else {
            time.clamp(0.0, self.duration)
        }
    }

    // ========================================================================
    // Track Editing
    // ========================================================================

    fn bone_entry(&mut self, bone: &str) -> &mut BoneTracks {
        let index = match self.bone_lookup.get(bone) {
            Some(&index) => index,
            None => {
                let index = self.bone_tracks.len();
                self.bone_tracks.push(BoneTracks::new(bone));
                self.bone_lookup.insert(bone.to_string(), index);
                index
            }
        };
        &mut self.bone_tracks[index]
    }

    fn blend_shape_entry(&mut self, shape: &str) -> &mut AnimationTrack<f32> {
        let index = match self.blend_shape_tracks.iter().position(|t| t.target == shape) {
            Some(index) => index,
            None => {
                self.blend_shape_tracks.push(AnimationTrack::new(shape));
                self.blend_shape_tracks.len() - 1
            }
        };
        &mut self.blend_shape_tracks[index]
    }

    pub fn add_translation_keyframe(&mut self, bone: &str, time: f32, value: Vec3, mode: InterpolationMode) {
        let path = format!("{bone}.{}", TargetPath::Translation.as_str());
        self.bone_entry(bone)
            .translation
            .get_or_insert_with(|| AnimationTrack::new(&path))
            .add_keyframe(time, value, mode);
        self.recompute_duration();
    }

    pub fn add_rotation_keyframe(&mut self, bone: &str, time: f32, value: Quat, mode: InterpolationMode) {
        let path = format!("{bone}.{}", TargetPath::Rotation.as_str());
        self.bone_entry(bone)
            .rotation
            .get_or_insert_with(|| AnimationTrack::new(&path))
            .add_keyframe(time, value, mode);
        self.recompute_duration();
    }

    pub fn add_scale_keyframe(&mut self, bone: &str, time: f32, value: Vec3, mode: InterpolationMode) {
        let path = format!("{bone}.{}", TargetPath::Scale.as_str());
        self.bone_entry(bone)
            .scale
            .get_or_insert_with(|| AnimationTrack::new(&path))
            .add_keyframe(time, value, mode);
        self.recompute_duration();
    }

    pub fn add_blend_shape_keyframe(&mut self, shape: &str, time: f32, weight: f32, mode: InterpolationMode) {
        self.blend_shape_entry(shape).add_keyframe(time, weight, mode);
        self.recompute_duration();
    }

    /// Installs a complete, already-built translation track (importer path).
    pub fn set_translation_track(&mut self, bone: &str, track: AnimationTrack<Vec3>) {
        self.bone_entry(bone).translation = Some(track);
        self.recompute_duration();
    }

    pub fn set_rotation_track(&mut self, bone: &str, track: AnimationTrack<Quat>) {
        self.bone_entry(bone).rotation = Some(track);
        self.recompute_duration();
    }

    pub fn set_scale_track(&mut self, bone: &str, track: AnimationTrack<Vec3>) {
        self.bone_entry(bone).scale = Some(track);
        self.recompute_duration();
    }

    /// Installs a blend-shape track; its `target` names the shape.
    pub fn set_blend_shape_track(&mut self, track: AnimationTrack<f32>) {
        match self.blend_shape_tracks.iter_mut().find(|t| t.target == track.target) {
            Some(existing) => *existing = track,
            None => self.blend_shape_tracks.push(track),
        }
        self.recompute_duration();
    }

    /// Mutes or unmutes one bone channel. Returns `false` if no such track exists.
    pub fn set_track_muted(&mut self, bone: &str, path: TargetPath, muted: bool) -> bool {
        match self.bone_lookup.get(bone) {
            Some(&index) => self.bone_tracks[index].set_muted(path, muted),
            None => false,
        }
    }

    pub fn set_blend_shape_muted(&mut self, shape: &str, muted: bool) -> bool {
        match self.blend_shape_tracks.iter_mut().find(|t| t.target == shape) {
            Some(track) => {
                track.muted = muted;
                true
            }
            None => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn bone_tracks(&self) -> &[BoneTracks] {
        &self.bone_tracks
    }

    #[must_use]
    pub fn bone_track(&self, bone: &str) -> Option<&BoneTracks> {
        self.bone_lookup.get(bone).map(|&i| &self.bone_tracks[i])
    }

    #[inline]
    #[must_use]
    pub fn blend_shape_tracks(&self) -> &[AnimationTrack<f32>] {
        &self.blend_shape_tracks
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn add_event(&mut self, time: f32, name: &str) {
        let index = self.events.partition_point(|e| e.time <= time);
        self.events.insert(
            index,
            AnimationEvent {
                time,
                name: name.to_string(),
            },
        );
    }

    #[inline]
    #[must_use]
    pub fn events(&self) -> &[AnimationEvent] {
        &self.events
    }

    /// All events within `tolerance` of `time`, in timeline order.
    #[must_use]
    pub fn events_at(&self, time: f32, tolerance: f32) -> Vec<&AnimationEvent> {
        let start = self.events.partition_point(|e| e.time < time - tolerance);
        self.events[start..]
            .iter()
            .take_while(|e| e.time <= time + tolerance)
            .collect()
    }

    /// Events with `from < time <= to`, in timeline order.
    pub fn events_in_range(&self, from: f32, to: f32) -> impl Iterator<Item = &AnimationEvent> {
        let start = self.events.partition_point(|e| e.time <= from);
        self.events[start..].iter().take_while(move |e| e.time <= to)
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    fn resolve_bone(&self, tracks: &BoneTracks, skeleton: &Skeleton) -> Option<usize> {
        let index = skeleton.find_bone_by_name(&tracks.bone_name);
        if index.is_none() {
            log::trace!(
                "Clip '{}': skeleton '{}' has no bone '{}', skipping",
                self.name,
                skeleton.name,
                tracks.bone_name
            );
        }
        index
    }

    /// Bone tracks whose bone exists in `skeleton`, paired with the bone index.
    pub fn bound_tracks<'a>(&'a self, skeleton: &'a Skeleton) -> impl Iterator<Item = (usize, &'a BoneTracks)> {
        self.bone_tracks
            .iter()
            .filter_map(|tracks| self.resolve_bone(tracks, skeleton).map(|i| (i, tracks)))
    }

    /// Poses `skeleton` at `time` and recomputes its matrices once.
    ///
    /// Tracks targeting bones the skeleton lacks, and muted tracks, are
    /// skipped. Blend-shape weights are written when a map is supplied.
    pub fn sample(&self, time: f32, skeleton: &mut Skeleton, blend_shape_weights: Option<&mut BlendShapeWeights>) {
        let time = self.wrap_time(time);

        for tracks in &self.bone_tracks {
            let Some(index) = self.resolve_bone(tracks, skeleton) else {
                continue;
            };
            if let Some(&base) = skeleton.local_transform(index) {
                skeleton.set_bone_local(index, tracks.sample(time, base));
            }
        }

        if let Some(weights) = blend_shape_weights {
            self.sample_blend_shapes(time, weights);
        }

        // One pass after all tracks, not one per track.
        skeleton.recompute();
    }

    /// Evaluates the clip at `time` into `pose` without touching the skeleton.
    ///
    /// Bones the clip does not animate keep their value in `pose`.
    pub fn sample_into_pose(&self, time: f32, skeleton: &Skeleton, pose: &mut Pose) {
        let time = self.wrap_time(time);
        for (index, tracks) in self.bound_tracks(skeleton) {
            if let Some(slot) = pose.get_mut(index) {
                *slot = tracks.sample(time, *slot);
            }
        }
    }

    pub fn sample_blend_shapes(&self, time: f32, weights: &mut BlendShapeWeights) {
        for track in self.blend_shape_tracks.iter().filter(|t| !t.muted) {
            weights.insert(track.target.clone(), track.evaluate(time));
        }
    }
}
