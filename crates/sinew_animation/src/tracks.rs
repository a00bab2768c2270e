use crate::easing::{InterpolationMode, bezier_ease};
use crate::keyframe::Keyframe;
use crate::values::Interpolatable;

/// Keyframes closer than this are treated as the same instant.
pub const KEYFRAME_TIME_TOLERANCE: f32 = 1e-4;

/// An ordered sequence of keyframes driving one animated property.
///
/// Keyframes are kept sorted by time with at most one per instant. After
/// every structural edit, automatic tangents are recomputed (Catmull-Rom
/// style) so cubic segments are C1-continuous without authored tangents.
#[derive(Debug, Clone)]
pub struct AnimationTrack<T: Interpolatable> {
    /// Target path, e.g. `"Elbow.rotation"`.
    pub target: String,
    pub muted: bool,
    keyframes: Vec<Keyframe<T>>,
}

impl<T: Interpolatable> AnimationTrack<T> {
    #[must_use]
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            muted: false,
            keyframes: Vec::new(),
        }
    }

    /// Builds a track from keyframes in any order.
    #[must_use]
    pub fn from_keyframes(target: &str, keyframes: impl IntoIterator<Item = Keyframe<T>>) -> Self {
        let mut track = Self::new(target);
        for keyframe in keyframes {
            track.insert_without_tangents(keyframe);
        }
        track.compute_tangents();
        track
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.keyframes.first().map_or(0.0, |k| k.time)
    }

    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Inserts a keyframe, replacing any keyframe at the same time.
    ///
    /// Returns the index the keyframe now occupies.
    pub fn add_keyframe(&mut self, time: f32, value: T, interpolation: InterpolationMode) -> usize {
        self.insert(Keyframe::new(time, value, interpolation))
    }

    pub fn insert(&mut self, keyframe: Keyframe<T>) -> usize {
        let index = self.insert_without_tangents(keyframe);
        self.compute_tangents();
        index
    }

    fn insert_without_tangents(&mut self, keyframe: Keyframe<T>) -> usize {
        let index = self
            .keyframes
            .partition_point(|k| k.time < keyframe.time - KEYFRAME_TIME_TOLERANCE);

        match self.keyframes.get_mut(index) {
            Some(existing) if (existing.time - keyframe.time).abs() <= KEYFRAME_TIME_TOLERANCE => {
                *existing = keyframe;
            }
            _ => self.keyframes.insert(index, keyframe),
        }
        index
    }

    pub fn remove_keyframe(&mut self, index: usize) -> Option<Keyframe<T>> {
        if index >= self.keyframes.len() {
            return None;
        }
        let removed = self.keyframes.remove(index);
        self.compute_tangents();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Authors explicit tangents on one keyframe and locks them.
    pub fn set_tangents(&mut self, index: usize, in_tangent: T, out_tangent: T) {
        if let Some(keyframe) = self.keyframes.get_mut(index) {
            keyframe.in_tangent = in_tangent;
            keyframe.out_tangent = out_tangent;
            keyframe.tangents_locked = true;
        }
    }

    /// Recomputes automatic tangents on every unlocked keyframe.
    ///
    /// Endpoints take the one-sided difference to their neighbour; interior
    /// keyframes take half the difference of their two neighbours. The same
    /// tangent is mirrored into `in_tangent` and `out_tangent`.
    pub fn compute_tangents(&mut self) {
        let len = self.keyframes.len();

        for i in 0..len {
            if self.keyframes[i].tangents_locked {
                continue;
            }

            let tangent = if len == 1 {
                T::scaled_difference(self.keyframes[0].value, self.keyframes[0].value, 0.0)
            } else if i == 0 {
                T::scaled_difference(self.keyframes[0].value, self.keyframes[1].value, 1.0)
            } else if i == len - 1 {
                T::scaled_difference(self.keyframes[i - 1].value, self.keyframes[i].value, 1.0)
            } else {
                T::scaled_difference(self.keyframes[i - 1].value, self.keyframes[i + 1].value, 0.5)
            };

            let keyframe = &mut self.keyframes[i];
            keyframe.in_tangent = tangent;
            keyframe.out_tangent = tangent;
        }
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Value of the track at `time`.
    ///
    /// Empty tracks yield `T::default()`; times outside the keyed range clamp
    /// to the boundary values (no extrapolation).
    #[must_use]
    pub fn evaluate(&self, time: f32) -> T {
        let (Some(first), Some(last)) = (self.keyframes.first(), self.keyframes.last()) else {
            return T::default();
        };

        if self.keyframes.len() == 1 || time.is_nan() || time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First keyframe strictly after `time`; lies in 1..len here.
        let next_idx = self.keyframes.partition_point(|k| k.time <= time);
        let k0 = &self.keyframes[next_idx - 1];
        let k1 = &self.keyframes[next_idx];

        let dt = k1.time - k0.time;
        let t = if dt > 1e-6 {
            ((time - k0.time) / dt).clamp(0.0, 1.0)
        } else {
            0.0
        };

        match k0.interpolation {
            InterpolationMode::Constant => k0.value,
            InterpolationMode::Hermite | InterpolationMode::CatmullRom => {
                T::interpolate_cubic(k0.value, k0.out_tangent, k1.in_tangent, k1.value, t, dt)
            }
            InterpolationMode::Bezier => {
                let eased = bezier_ease(t, k0.out_handle, k1.in_handle);
                T::interpolate_linear(k0.value, k1.value, eased)
            }
            mode => T::interpolate_linear(k0.value, k1.value, mode.ease(t)),
        }
    }
}

impl<T: Interpolatable> Default for AnimationTrack<T> {
    fn default() -> Self {
        Self::new("")
    }
}
