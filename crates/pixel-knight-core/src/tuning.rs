//! Gameplay tuning values
//!
//! Every value is in pixels and ticks (60 per second). The defaults are the
//! shipped feel of the game; the app config can override any of them.

use serde::{Deserialize, Serialize};

/// Player physics and movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Collision box size in pixels
    pub width: i32,
    pub height: i32,

    pub terminal_velocity: f32,
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_velocity: f32,
    pub air_jumps: i32,
    pub air_jump_velocity: f32,
    pub air_dashes: i32,
    /// Upward velocity is divided by this on jump release
    pub variable_jump_shear: f32,
    /// Ticks of airtime tolerated before the player counts as airborne
    pub airtime_buffer: i32,
    pub low_gravity_threshold: f32,
    pub low_gravity_divisor: f32,

    pub dash_speed: f32,
    pub dash_ticks: f32,
    pub dash_cooldown_ticks: i32,

    pub wall_slide_velocity: f32,
    pub wall_jump_velocity: f32,
    /// Ticks the wall jump pushes the player away from the wall
    pub wall_jump_cutoff: f32,
    /// Ticks of zero horizontal input after the push
    pub wall_jump_stall: f32,
    /// Grace period to wall jump after leaving a wall
    pub wall_jump_buffer: i32,

    /// Kill plane below the level (only right of `depths_x`)
    pub depths_y: f32,
    pub depths_x: f32,

    pub run_particle_delay: f32,
    pub hitstun_particles: u32,
    pub max_falling_volume: f32,
    /// Ticks of invulnerability after a respawn
    pub respawn_intangibility: i32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 10,
            height: 14,
            terminal_velocity: 5.0,
            gravity: 0.2,
            move_speed: 1.8,
            jump_velocity: -5.05,
            air_jumps: 1,
            air_jump_velocity: -4.6,
            air_dashes: 1,
            variable_jump_shear: 12.0,
            airtime_buffer: 4,
            low_gravity_threshold: 0.6,
            low_gravity_divisor: 1.3,
            dash_speed: 4.0,
            dash_ticks: 15.0,
            dash_cooldown_ticks: 22,
            wall_slide_velocity: 1.33,
            wall_jump_velocity: -4.6,
            wall_jump_cutoff: 8.0,
            wall_jump_stall: 2.0,
            wall_jump_buffer: 10,
            depths_y: 400.0,
            depths_x: -300.0,
            run_particle_delay: 10.0,
            hitstun_particles: 80,
            max_falling_volume: 0.2,
            respawn_intangibility: 60,
        }
    }
}

/// Camera follow tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Divisor applied to the remaining distance each tick (higher = lazier)
    pub smoothing: f32,
    /// Extra scroll per tick while the player looks up or down
    pub look_offset: f32,
    /// Idle ticks before looking moves the camera
    pub look_threshold: i32,
    /// Smoothing multiplier while looking
    pub look_smoothing_factor: f32,
    /// Keep the view inside the level bounds
    pub clamp_to_level: bool,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            smoothing: 10.0,
            look_offset: 4.5,
            look_threshold: 30,
            look_smoothing_factor: 1.75,
            clamp_to_level: false,
        }
    }
}
