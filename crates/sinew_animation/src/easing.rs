use glam::Vec2;

/// How a keyframe segment travels from its start keyframe to the next one.
///
/// The mode stored on the *start* keyframe of a segment governs that segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Holds the start value for the whole segment.
    Constant,
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Bounce,
    Elastic,
    Back,
    /// Cubic Hermite through the keyframes' stored tangents.
    Hermite,
    /// Cubic Hermite with automatically computed Catmull-Rom tangents.
    CatmullRom,
    /// Cubic-bezier timing curve from the keyframes' handles.
    Bezier,
}

impl InterpolationMode {
    /// True for modes that evaluate the Hermite basis on values directly.
    #[inline]
    #[must_use]
    pub fn is_cubic(self) -> bool {
        matches!(self, Self::Hermite | Self::CatmullRom)
    }

    /// Reshapes the normalized segment time `t` for modes that blend with a
    /// timing curve. Cubic, Bezier and Constant modes return `t` unchanged;
    /// they are handled by the track.
    #[must_use]
    pub fn ease(self, t: f32) -> f32 {
        match self {
            Self::EaseIn => ease_in(t),
            Self::EaseOut => ease_out(t),
            Self::EaseInOut => ease_in_out(t),
            Self::Bounce => bounce(t),
            Self::Elastic => elastic(t),
            Self::Back => back(t),
            Self::Constant
            | Self::Linear
            | Self::Hermite
            | Self::CatmullRom
            | Self::Bezier => t,
        }
    }
}

// ---------------------------------------------------------------------------
// Easing curves
// ---------------------------------------------------------------------------

/// Quadratic acceleration: `t²`.
#[inline]
#[must_use]
pub fn ease_in(t: f32) -> f32 {
    t * t
}

/// Quadratic deceleration: `t(2 - t)`.
#[inline]
#[must_use]
pub fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

/// Piecewise quadratic: accelerate over the first half, decelerate over the second.
#[inline]
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Decaying bounce made of four quadratic arcs; settles at 1.
#[must_use]
pub fn bounce(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984_375
    }
}

/// Exponentially decaying sine that overshoots and settles at 1.
#[must_use]
pub fn elastic(t: f32) -> f32 {
    const C4: f32 = std::f32::consts::TAU / 3.0;

    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
    }
}

/// Cubic overshoot past 1 before settling.
#[must_use]
pub fn back(t: f32) -> f32 {
    const C1: f32 = 1.701_58;
    const C3: f32 = C1 + 1.0;

    let u = t - 1.0;
    1.0 + C3 * u * u * u + C1 * u * u
}

// ---------------------------------------------------------------------------
// Bezier timing
// ---------------------------------------------------------------------------

#[inline]
fn cubic_bezier(p1: f32, p2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

/// Cubic-bezier timing through `(0,0)`, `c1`, `c2`, `(1,1)`.
///
/// The x curve is inverted by bisection, then the eased y is returned.
/// Handles are expected in the unit square so x stays monotonic.
#[must_use]
pub fn bezier_ease(t: f32, c1: Vec2, c2: Vec2) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if c1 == Vec2::ZERO && c2 == Vec2::ONE {
        return t;
    }

    let mut lo = 0.0_f32;
    let mut hi = 1.0_f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(c1.x, c2.x, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(c1.y, c2.y, mid)
}
