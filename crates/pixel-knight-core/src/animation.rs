//! Tick driven sprite animations
//!
//! An [`Animation`] only tracks which frame is showing; the renderer decides
//! what a frame looks like. Non-looping animations hold their last frame and
//! raise `done`, which particles use as their lifetime.

use serde::{Deserialize, Serialize};

/// Static description of an animation: frame count, ticks per frame, looping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpec {
    pub frames: u32,
    pub frame_duration: u32,
    pub looping: bool,
}

impl AnimationSpec {
    pub const fn looping(frames: u32, frame_duration: u32) -> Self {
        Self {
            frames,
            frame_duration,
            looping: true,
        }
    }

    pub const fn once(frames: u32, frame_duration: u32) -> Self {
        Self {
            frames,
            frame_duration,
            looping: false,
        }
    }

    /// Total length in ticks
    pub const fn total_ticks(&self) -> u32 {
        self.frames * self.frame_duration
    }

    /// Start a fresh animation from this spec
    pub fn start(&self) -> Animation {
        Animation::new(*self)
    }
}

/// Running animation state
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    spec: AnimationSpec,
    /// Tick counter inside the animation, not the image index
    pub frame: u32,
    pub done: bool,
}

impl Animation {
    pub fn new(spec: AnimationSpec) -> Self {
        Self {
            spec: AnimationSpec {
                frames: spec.frames.max(1),
                frame_duration: spec.frame_duration.max(1),
                looping: spec.looping,
            },
            frame: 0,
            done: false,
        }
    }

    /// Start at a given tick offset (used to desync particle bursts)
    pub fn starting_at(spec: AnimationSpec, frame: u32) -> Self {
        let mut animation = Self::new(spec);
        animation.frame = frame.min(animation.spec.total_ticks() - 1);
        animation
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }

    /// Advance one tick
    pub fn update(&mut self) {
        let total = self.spec.total_ticks();
        if self.spec.looping {
            self.frame = (self.frame + 1) % total;
        } else {
            self.frame = (self.frame + 1).min(total - 1);
            if self.frame >= total - 1 {
                self.done = true;
            }
        }
    }

    /// Index of the image currently showing
    pub fn image_index(&self) -> u32 {
        self.frame / self.spec.frame_duration
    }

    /// Fraction of the animation played, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        let total = self.spec.total_ticks();
        if total <= 1 {
            return 1.0;
        }
        self.frame as f32 / (total - 1) as f32
    }
}

/// Every animation state the player can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    #[default]
    Idle,
    LookUp,
    LookDown,
    Run,
    Jump,
    Fall,
    WallSlide,
    Dash,
    Cloak,
    Hitstun,
    Kneel,
    Float,
}

impl PlayerAction {
    pub fn spec(self) -> AnimationSpec {
        match self {
            PlayerAction::Idle => AnimationSpec::looping(4, 5),
            PlayerAction::LookUp => AnimationSpec::once(3, 4),
            PlayerAction::LookDown => AnimationSpec::once(3, 4),
            PlayerAction::Run => AnimationSpec::looping(8, 5),
            PlayerAction::Jump => AnimationSpec::looping(2, 5),
            PlayerAction::Fall => AnimationSpec::looping(2, 5),
            PlayerAction::WallSlide => AnimationSpec::looping(2, 5),
            PlayerAction::Dash => AnimationSpec::once(5, 3),
            PlayerAction::Cloak => AnimationSpec::once(5, 3),
            PlayerAction::Hitstun => AnimationSpec::looping(3, 5),
            PlayerAction::Kneel => AnimationSpec::looping(2, 5),
            PlayerAction::Float => AnimationSpec::looping(2, 5),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerAction::Idle => "idle",
            PlayerAction::LookUp => "look_up",
            PlayerAction::LookDown => "look_down",
            PlayerAction::Run => "run",
            PlayerAction::Jump => "jump",
            PlayerAction::Fall => "fall",
            PlayerAction::WallSlide => "wall_slide",
            PlayerAction::Dash => "dash",
            PlayerAction::Cloak => "cloak",
            PlayerAction::Hitstun => "hitstun",
            PlayerAction::Kneel => "kneel",
            PlayerAction::Float => "float",
        }
    }
}
