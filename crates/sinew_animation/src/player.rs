use std::sync::Arc;

use sinew_rig::{BlendShapeWeights, Skeleton};

use crate::clip::{AnimationClip, AnimationEvent};

pub const DEFAULT_FRAME_RATE: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
    PingPong,
}

/// Editor-style transport over a single clip: play, pause, seek and
/// frame stepping, plus event reporting.
///
/// Events are not dispatched here; [`AnimationPlayer::update`] returns the
/// events crossed during the step and the caller decides what to do.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    clip: Arc<AnimationClip>,

    time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    pub frame_rate: f32,
    playing: bool,
    /// Ping-pong travel: `1.0` toward the end, `-1.0` back toward the start.
    direction: f32,
    /// Events sitting exactly on the start time still have to fire.
    at_start: bool,
}

impl AnimationPlayer {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let loop_mode = if clip.looping {
            LoopMode::Loop
        } else {
            LoopMode::Once
        };
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            loop_mode,
            frame_rate: DEFAULT_FRAME_RATE,
            playing: false,
            direction: 1.0,
            at_start: true,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    // ========================================================================
    // Transport
    // ========================================================================

    pub fn play(&mut self) {
        // Restart a finished one-shot.
        if self.loop_mode == LoopMode::Once && self.time >= self.clip.duration() {
            self.rewind();
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.rewind();
    }

    fn rewind(&mut self) {
        self.time = 0.0;
        self.direction = 1.0;
        self.at_start = true;
    }

    /// Jumps to `time`, clamped to the clip. Fires no events.
    pub fn seek(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.clip.duration());
        self.at_start = false;
    }

    /// Pauses and moves by `frames` whole frames (negative steps backward).
    pub fn step_frames(&mut self, frames: i32) {
        self.playing = false;
        if self.frame_rate <= 0.0 {
            return;
        }
        self.at_start = false;
        let target = self.time + frames as f32 / self.frame_rate;
        self.time = match self.loop_mode {
            LoopMode::Loop if self.clip.duration() > 0.0 => target.rem_euclid(self.clip.duration()),
            _ => target.clamp(0.0, self.clip.duration()),
        };
    }

    #[must_use]
    pub fn current_frame(&self) -> u32 {
        (self.time * self.frame_rate).floor().max(0.0) as u32
    }

    #[must_use]
    pub fn frame_count(&self) -> u32 {
        (self.clip.duration() * self.frame_rate).ceil().max(0.0) as u32 + 1
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Advances time and returns the events crossed, in the order crossed.
    pub fn update(&mut self, dt: f32) -> Vec<AnimationEvent> {
        let mut fired = Vec::new();
        if !self.playing {
            return fired;
        }

        let duration = self.clip.duration();
        if duration <= 0.0 {
            return fired;
        }

        let previous = self.time;
        let step = dt * self.time_scale;
        let raw = previous + step;

        // The first forward step from a rewound player includes the start time.
        let at_start = std::mem::take(&mut self.at_start);
        if at_start && step * self.direction > 0.0 {
            fired.extend(self.clip.events().iter().take_while(|e| e.time <= previous).cloned());
        }

        match self.loop_mode {
            LoopMode::Once => {
                let clamped = raw.clamp(0.0, duration);
                self.collect_events(previous, clamped, &mut fired);
                self.time = clamped;
                if raw >= duration || raw <= 0.0 {
                    self.playing = false;
                }
            }
            LoopMode::Loop => {
                if raw >= duration {
                    self.collect_events(previous, duration, &mut fired);
                    let wrapped = raw % duration;
                    self.collect_events_from_start(wrapped, &mut fired);
                    self.time = wrapped;
                } else if raw < 0.0 {
                    // Reverse playback wrapping past the start.
                    self.collect_events(previous, 0.0, &mut fired);
                    let wrapped = duration + (raw % duration);
                    self.collect_events(duration, wrapped, &mut fired);
                    self.time = wrapped;
                } else {
                    self.collect_events(previous, raw, &mut fired);
                    self.time = raw;
                }
            }
            LoopMode::PingPong => {
                let mut t = previous;
                let mut travel = self.direction * step.signum();
                let mut remaining = step.abs() % (duration * 2.0);
                while remaining > 0.0 {
                    let end = if travel > 0.0 { duration } else { 0.0 };
                    let room = (end - t).abs();
                    if remaining < room {
                        let next = t + remaining * travel;
                        self.collect_events(t, next, &mut fired);
                        t = next;
                        break;
                    }
                    // Split at the turn so events on both legs fire.
                    self.collect_events(t, end, &mut fired);
                    t = end;
                    remaining -= room;
                    travel = -travel;
                }
                if step != 0.0 {
                    self.direction = travel * step.signum();
                }
                self.time = t;
            }
        }

        fired
    }

    fn collect_events(&self, from: f32, to: f32, out: &mut Vec<AnimationEvent>) {
        if to >= from {
            out.extend(self.clip.events_in_range(from, to).cloned());
        } else {
            // Backward: events in [to, from), latest first.
            let mut crossed: Vec<_> = self
                .clip
                .events()
                .iter()
                .filter(|e| e.time >= to && e.time < from)
                .cloned()
                .collect();
            crossed.reverse();
            out.extend(crossed);
        }
    }

    fn collect_events_from_start(&self, to: f32, out: &mut Vec<AnimationEvent>) {
        out.extend(
            self.clip
                .events()
                .iter()
                .take_while(|e| e.time <= to)
                .cloned(),
        );
    }

    /// Poses the skeleton at the current time.
    pub fn sample(&self, skeleton: &mut Skeleton, blend_shape_weights: Option<&mut BlendShapeWeights>) {
        self.clip.sample(self.time, skeleton, blend_shape_weights);
    }
}
