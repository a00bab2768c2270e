use glam::Vec2;

use crate::easing::InterpolationMode;
use crate::values::Interpolatable;

/// A timed value plus the data every interpolation mode may need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T: Interpolatable> {
    pub time: f32,
    pub value: T,
    /// Governs the segment that starts at this keyframe.
    pub interpolation: InterpolationMode,
    pub in_tangent: T,
    pub out_tangent: T,
    /// Bezier timing handle arriving at this keyframe (normalized segment space).
    pub in_handle: Vec2,
    /// Bezier timing handle leaving this keyframe (normalized segment space).
    pub out_handle: Vec2,
    /// Authored tangents; automatic tangent computation leaves them alone.
    pub tangents_locked: bool,
}

impl<T: Interpolatable> Keyframe<T> {
    #[must_use]
    pub fn new(time: f32, value: T, interpolation: InterpolationMode) -> Self {
        Self {
            time,
            value,
            interpolation,
            in_tangent: T::default(),
            out_tangent: T::default(),
            in_handle: Vec2::ONE,
            out_handle: Vec2::ZERO,
            tangents_locked: false,
        }
    }

    /// Keyframe whose outgoing segment uses Bezier timing.
    ///
    /// `out_handle` shapes the segment leaving this keyframe, `in_handle`
    /// the segment arriving at it.
    #[must_use]
    pub fn with_handles(mut self, in_handle: Vec2, out_handle: Vec2) -> Self {
        self.in_handle = in_handle;
        self.out_handle = out_handle;
        self
    }

    #[must_use]
    pub fn with_tangents(mut self, in_tangent: T, out_tangent: T) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self.tangents_locked = true;
        self
    }
}
