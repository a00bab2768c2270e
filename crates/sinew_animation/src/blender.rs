use std::sync::Arc;

use glam::{Quat, Vec3};
use sinew_core::math::LENGTH_EPSILON;
use sinew_rig::{Pose, Skeleton, Transform};

use crate::clip::AnimationClip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Replaces (blends toward) the accumulated pose.
    #[default]
    Override,
    /// Adds its motion on top of the accumulated pose.
    Additive,
}

/// Pose an additive layer's samples are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdditiveReference {
    /// Identity transforms: the clip's values are the deltas themselves.
    #[default]
    Rest,
    /// The clip's own first frame (`t = 0`).
    ClipStart,
}

#[derive(Debug, Clone)]
pub struct AnimationLayer {
    clip: Arc<AnimationClip>,

    pub weight: f32,
    pub mode: BlendMode,
    pub reference: AdditiveReference,
    pub time: f32,
    pub time_scale: f32,
    pub enabled: bool,
}

impl AnimationLayer {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>, weight: f32, mode: BlendMode) -> Self {
        Self {
            clip,
            weight,
            mode,
            reference: AdditiveReference::Rest,
            time: 0.0,
            time_scale: 1.0,
            enabled: true,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Advances the layer's time, wrapping or clamping by its clip.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        self.time = self.clip.wrap_time(self.time + dt * self.time_scale);
    }

    #[inline]
    fn contributes(&self) -> bool {
        self.enabled && self.weight > 0.0
    }
}

/// Composes clip layers into one skeleton pose.
///
/// Layers apply in registration order:
///
/// - The first override layer sets the base pose outright (counted with
///   weight 1). Every later override layer `i` blends toward its own pose by
///   `w_i / (1 + Σ w_j)`, summing the later override weights up to and
///   including `i`. This is sequential normalization, so swapping two layers
///   changes the result even when their weights are equal.
/// - Additive layers stay out of that running sum. Their translation is
///   scaled by the weight and added; their rotation delta is applied as
///   `base * slerp(identity, delta, weight)`; their scale is multiplied in
///   as `lerp(1, scale, weight)`.
///
/// Layers that are disabled or have weight ≤ 0 are skipped entirely. The
/// running weight lives only inside one `sample` call.
///
/// Every sample starts from the blender's base pose, never from the
/// skeleton's current locals, so repeated samples at the same layer times
/// produce the same pose. Without an explicit base pose, the skeleton's
/// locals are captured on the first sample.
#[derive(Debug, Clone, Default)]
pub struct AnimationBlender {
    layers: Vec<AnimationLayer>,
    base_pose: Option<Pose>,
}

impl AnimationBlender {
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            base_pose: None,
        }
    }

    #[must_use]
    pub fn with_base_pose(mut self, pose: Pose) -> Self {
        self.base_pose = Some(pose);
        self
    }

    /// Pose every sample starts from. Bones no layer animates keep it.
    pub fn set_base_pose(&mut self, pose: Pose) {
        self.base_pose = Some(pose);
    }

    /// Snapshots the skeleton's current locals as the base pose.
    pub fn capture_base_pose(&mut self, skeleton: &Skeleton) {
        self.base_pose = Some(Pose::from_skeleton(skeleton));
    }

    #[inline]
    #[must_use]
    pub fn base_pose(&self) -> Option<&Pose> {
        self.base_pose.as_ref()
    }

    /// Registers a layer and returns its index.
    pub fn add_layer(&mut self, clip: Arc<AnimationClip>, weight: f32, mode: BlendMode) -> usize {
        self.layers.push(AnimationLayer::new(clip, weight, mode));
        self.layers.len() - 1
    }

    pub fn push_layer(&mut self, layer: AnimationLayer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    pub fn remove_layer(&mut self, index: usize) -> Option<AnimationLayer> {
        (index < self.layers.len()).then(|| self.layers.remove(index))
    }

    #[inline]
    #[must_use]
    pub fn layer(&self, index: usize) -> Option<&AnimationLayer> {
        self.layers.get(index)
    }

    #[inline]
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut AnimationLayer> {
        self.layers.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn layers(&self) -> &[AnimationLayer] {
        &self.layers
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Sets every layer's time.
    pub fn set_time(&mut self, time: f32) {
        for layer in &mut self.layers {
            layer.time = layer.clip.wrap_time(time);
        }
    }

    pub fn update(&mut self, dt: f32) {
        for layer in &mut self.layers {
            layer.update(dt);
        }
    }

    /// Blends all layers into `skeleton` and recomputes its matrices once.
    pub fn sample(&mut self, skeleton: &mut Skeleton) {
        let stale = self
            .base_pose
            .as_ref()
            .is_none_or(|pose| pose.len() != skeleton.bone_count());
        if stale {
            log::debug!(
                "Blender: capturing base pose from skeleton '{}' ({} bones)",
                skeleton.name,
                skeleton.bone_count()
            );
            self.capture_base_pose(skeleton);
        }
        let mut base = self
            .base_pose
            .clone()
            .unwrap_or_else(|| Pose::from_skeleton(skeleton));
        let mut running_weight = 0.0_f32;

        for layer in self.layers.iter().filter(|l| l.contributes()) {
            match layer.mode {
                BlendMode::Override => {
                    if running_weight <= 0.0 {
                        layer.clip.sample_into_pose(layer.time, skeleton, &mut base);
                        running_weight = 1.0;
                    } else {
                        running_weight += layer.weight;
                        let alpha = layer.weight / running_weight;
                        blend_override(layer, skeleton, &mut base, alpha);
                    }
                }
                BlendMode::Additive => apply_additive(layer, skeleton, &mut base),
            }
        }

        base.apply_to(skeleton);
        skeleton.recompute();
    }
}

fn blend_override(layer: &AnimationLayer, skeleton: &Skeleton, base: &mut Pose, alpha: f32) {
    let time = layer.clip.wrap_time(layer.time);
    for (index, tracks) in layer.clip.bound_tracks(skeleton) {
        if let Some(slot) = base.get_mut(index) {
            let sampled = tracks.sample(time, *slot);
            *slot = slot.blend(&sampled, alpha);
        }
    }
}

fn apply_additive(layer: &AnimationLayer, skeleton: &Skeleton, base: &mut Pose) {
    let time = layer.clip.wrap_time(layer.time);
    let weight = layer.weight;

    for (index, tracks) in layer.clip.bound_tracks(skeleton) {
        let Some(slot) = base.get_mut(index) else {
            continue;
        };

        let sampled = tracks.sample(time, Transform::IDENTITY);
        let reference = match layer.reference {
            AdditiveReference::Rest => Transform::IDENTITY,
            AdditiveReference::ClipStart => tracks.sample(0.0, Transform::IDENTITY),
        };

        let delta_position = sampled.position - reference.position;
        let delta_rotation = reference.rotation.inverse() * sampled.rotation;
        let usable = reference.scale.abs().cmpgt(Vec3::splat(LENGTH_EPSILON));
        let delta_scale = Vec3::select(usable, sampled.scale / reference.scale, Vec3::ONE);

        slot.position += delta_position * weight;
        slot.rotation = (slot.rotation * Quat::IDENTITY.slerp(delta_rotation, weight)).normalize();
        slot.scale *= Vec3::ONE.lerp(delta_scale, weight);
    }
}
