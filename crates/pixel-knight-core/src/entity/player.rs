use glam::{IVec2, Vec2};

use super::physics::PhysicsBody;
use crate::animation::PlayerAction;
use crate::audio::{AudioQueue, SoundId};
use crate::geometry::{to_vec2, Rect};
use crate::particles::{ParticleKind, ParticleSystem};
use crate::progression::{Abilities, Ability};
use crate::rng::GameRng;
use crate::tilemap::{TileKind, Tilemap};
use crate::tuning::PlayerTuning;
use crate::TICK_RATE;

/// Everything a player update may touch besides the player itself
pub struct PlayerContext<'a> {
    pub tilemap: &'a Tilemap,
    pub particles: &'a mut ParticleSystem,
    pub audio: &'a mut AudioQueue,
    pub rng: &'a mut GameRng,
}

/// What happened during one player update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStep {
    /// Fell out of the level or landed on spikes
    pub hazard: bool,
    pub landed: bool,
}

/// Plain dash or its cloak upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashKind {
    #[default]
    Dash,
    Cloak,
}

impl DashKind {
    pub fn action(self) -> PlayerAction {
        match self {
            DashKind::Dash => PlayerAction::Dash,
            DashKind::Cloak => PlayerAction::Cloak,
        }
    }

    pub fn particle(self) -> ParticleKind {
        match self {
            DashKind::Dash => ParticleKind::Dash,
            DashKind::Cloak => ParticleKind::Cloak,
        }
    }

    pub fn sound(self) -> SoundId {
        match self {
            DashKind::Dash => SoundId::Dash,
            DashKind::Cloak => SoundId::Cloak,
        }
    }
}

/// The player entity
#[derive(Debug, Clone)]
pub struct Player {
    pub body: PhysicsBody,
    pub tuning: PlayerTuning,
    pub abilities: Abilities,
    pub can_move: bool,
    pub deaths: u32,
    /// 255 normally, lowered while intangible
    pub opacity: u8,
    pub intangibility_timer: i32,

    // Held input, set by the game each tick
    pub holding_left: bool,
    pub holding_right: bool,
    pub holding_up: bool,
    pub holding_down: bool,
    pub looking_up: bool,
    pub looking_down: bool,
    pub idle_timer: i32,
    pub running_time: i32,

    // Jumping and walls
    pub air_time: i32,
    pub falling_time: i32,
    pub wall_jump_timer: f32,
    /// Direction of the last wall jump
    pub wall_jump_right: bool,
    pub sliding_time: i32,
    pub wall_slide: bool,
    /// Ticks since the player last touched a wall while sliding
    pub wall_slide_timer: i32,
    pub wall_slide_right: bool,
    /// X position when the current slide started
    pub wall_slide_x: f32,
    pub jumps: i32,
    /// Ticks since a wing jump started, 0 when not wing jumping
    pub air_jumping: i32,

    // Dashing
    pub dashes: i32,
    /// Remaining dash ticks; the sign is the direction
    pub dash_timer: f32,
    pub dash_kind: DashKind,
    pub cloak_timer: i32,
    pub dash_cooldown_timer: i32,

    /// Current volume of the falling wind loop
    pub falling_volume: f32,
    falling_playing: bool,
    wall_slide_playing: bool,
}

impl Player {
    pub const ANIM_OFFSET: IVec2 = IVec2::new(-3, -8);
    pub const DASH_ANIM_OFFSET: IVec2 = IVec2::new(-9, -8);

    const SLIDE_SFX_LEN: i32 = 150;
    const RUN_SFX_LEN: i32 = 120;
    const WING_DRIFT_TICKS: i32 = 16;

    pub fn new(pos: Vec2, tuning: PlayerTuning) -> Self {
        let mut body = PhysicsBody::new(
            pos,
            IVec2::new(tuning.width, tuning.height),
            tuning.gravity,
            tuning.terminal_velocity,
        );
        body.anim_offset = Self::ANIM_OFFSET;

        Self {
            body,
            tuning,
            abilities: Abilities::empty(),
            can_move: true,
            deaths: 0,
            opacity: 255,
            intangibility_timer: 0,
            holding_left: false,
            holding_right: false,
            holding_up: false,
            holding_down: false,
            looking_up: false,
            looking_down: false,
            idle_timer: 0,
            running_time: 0,
            air_time: -10,
            falling_time: 0,
            // Past the wall jump push so a fresh player is not shoved sideways
            wall_jump_timer: (tuning.wall_jump_buffer + 5) as f32,
            wall_jump_right: false,
            sliding_time: 0,
            wall_slide: false,
            wall_slide_timer: 1,
            wall_slide_right: false,
            wall_slide_x: 0.0,
            jumps: tuning.air_jumps,
            air_jumping: 0,
            dashes: tuning.air_dashes,
            dash_timer: 0.0,
            dash_kind: DashKind::Dash,
            cloak_timer: 0,
            dash_cooldown_timer: 0,
            falling_volume: 0.0,
            falling_playing: false,
            wall_slide_playing: false,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn has(&self, ability: Ability) -> bool {
        self.abilities.has(ability)
    }

    pub fn action(&self) -> PlayerAction {
        self.body.action
    }

    pub fn set_action(&mut self, action: PlayerAction) {
        self.body.set_action(action);
    }

    pub fn is_dashing(&self) -> bool {
        self.dash_timer != 0.0
    }

    /// Advance the player one tick with horizontal input `input_x` in [-1, 1]
    pub fn update(&mut self, ctx: &mut PlayerContext<'_>, input_x: f32) -> PlayerStep {
        let t = self.tuning;
        let buffer = t.airtime_buffer;
        let mut step = PlayerStep::default();

        // 1. Horizontal movement, overridden after wall jumps and while dashing
        let move_x = if self.wall_jump_timer < t.wall_jump_cutoff {
            if self.wall_jump_right {
                t.move_speed
            } else {
                -t.move_speed
            }
        } else if self.wall_jump_timer < t.wall_jump_cutoff + t.wall_jump_stall {
            0.0
        } else if self.is_dashing() {
            self.dash_timer.signum() * t.dash_speed
        } else {
            input_x * t.move_speed
        };

        // 2. Gravity: none while dashing, floaty at the jump peak
        let vy = self.body.velocity.y;
        self.body.gravity = if self.is_dashing() {
            0.0
        } else if self.air_time > buffer && vy.abs() < t.low_gravity_threshold {
            t.gravity / t.low_gravity_divisor
        } else {
            t.gravity
        };

        // 3. Collision and position
        if self.can_move {
            self.body.step(ctx.tilemap, Vec2::new(move_x, 0.0));
        }
        let collisions = self.body.collisions;

        // 4. Out of the level or standing on spikes
        let pos = self.body.pos;
        let on_spikes = ctx
            .tilemap
            .tile_below(to_vec2(self.rect().center()))
            .is_some_and(|tile| tile.kind.is_hazard());
        if (pos.y > t.depths_y && pos.x > t.depths_x)
            || pos.y > t.depths_y * 4.0
            || (on_spikes && collisions.down)
        {
            step.hazard = true;
        }

        // 5. Timers
        self.intangibility_timer -= 1;
        self.air_time += 1;
        self.wall_jump_timer += 1.0;
        self.dash_cooldown_timer += 1;
        self.wall_slide_timer += 1;
        self.wall_slide = false;
        self.body.anim_offset = Self::ANIM_OFFSET;
        if self.air_jumping > 0 {
            self.air_jumping += 1;
        }
        if self.cloak_timer > 0 {
            self.cloak_timer += 1;
        }

        // 6. Landing restores mobility
        if collisions.down {
            self.restore_mobility();
            if self.air_time > buffer
                && self.dash_cooldown_timer as f32 > t.dash_ticks
                && !on_spikes
            {
                let hard = self.falling_volume > t.max_falling_volume - 0.01;
                ctx.audio.play(if hard { SoundId::LandHard } else { SoundId::Land });
                let feet = to_vec2(self.rect().mid_bottom());
                ctx.particles.spawn_landing(feet, hard, ctx.rng);
                step.landed = true;
                log::debug!("Landed (hard: {}) after {} ticks", hard, self.air_time);
            }
            self.stop_falling_sound(ctx.audio);
            self.air_time = 0;
        }

        // 7. Grabbing a wall restores mobility too
        if self.sliding_time > 0 {
            self.restore_mobility();
            self.stop_falling_sound(ctx.audio);
        }

        // 8. Dash timer decays toward zero from both sides
        if self.dash_timer > 0.0 {
            self.dash_timer = (self.dash_timer - 1.0).max(0.0);
        }
        if self.dash_timer < 0.0 {
            self.dash_timer = (self.dash_timer + 1.0).min(0.0);
        }

        // 9. Animation hierarchy
        let idling = self.update_animation(ctx, move_x);

        // 10. Idle timer drives the camera look
        if idling {
            self.idle_timer += 1;
        } else {
            self.idle_timer = 0;
        }

        // 11. Cancel the slide once the player moves away from the wall
        if self.sliding_time > 1 && self.body.pos.x != self.wall_slide_x {
            let left_wall = if self.wall_slide_right {
                self.body.pos.x > self.wall_slide_x
            } else {
                self.body.pos.x < self.wall_slide_x
            };
            if left_wall {
                self.wall_slide = false;
                self.sliding_time = 0;
                self.wall_slide_timer = t.wall_jump_buffer;
            }
        }

        // 12. Translucent while intangible
        self.opacity = if self.intangibility_timer > 1 { 230 } else { 255 };

        // 13. Falling wind ramps up after a second of free fall
        self.update_falling(ctx.audio);

        // 14. No lingering loops
        if !self.wall_slide {
            self.stop_wall_slide_sound(ctx.audio);
            if self.has(Ability::Claw) {
                self.sliding_time = 0;
            }
        }
        if self.air_time > buffer || self.idle_timer > buffer {
            if self.running_time > 0 {
                ctx.audio.stop(SoundId::RunGrass);
                ctx.audio.stop(SoundId::RunStone);
            }
            self.running_time = 0;
        }

        step
    }

    /// Pick the animation for this tick. Returns whether the player is idling.
    fn update_animation(&mut self, ctx: &mut PlayerContext<'_>, move_x: f32) -> bool {
        let t = self.tuning;
        let buffer = t.airtime_buffer;
        let collisions = self.body.collisions;
        self.looking_up = false;
        self.looking_down = false;

        if !self.can_move {
            return false;
        }

        if collisions.horizontal()
            && self.air_time > buffer
            && self.body.velocity.y > 0.0
            && self.has(Ability::Claw)
            && self.dash_cooldown_timer > 1
        {
            // Wall slide
            if self.wall_slide_timer > buffer {
                ctx.audio.play(SoundId::MantisClaw);
            }
            if self.sliding_time % Self::SLIDE_SFX_LEN == 1 {
                ctx.audio.play(SoundId::WallSlide);
                self.wall_slide_playing = true;
            }

            self.wall_slide = true;
            self.wall_slide_timer = 0;
            self.wall_slide_right = collisions.right;
            self.sliding_time += 1;
            if self.sliding_time == 1 {
                self.wall_slide_x = self.body.pos.x;
            }

            self.dash_timer /= 3.0;
            self.body.velocity.y = self.body.velocity.y.min(t.wall_slide_velocity);
            self.set_action(PlayerAction::WallSlide);

            let rect = self.rect();
            let contact = if self.wall_slide_right {
                self.body.flip = false;
                rect.mid_right()
            } else {
                self.body.flip = true;
                rect.mid_left()
            };
            ctx.particles.spawn_wall_slide(to_vec2(contact), ctx.rng);
            false
        } else if self.is_dashing() {
            self.set_action(self.dash_kind.action());
            self.body.anim_offset = Self::DASH_ANIM_OFFSET;
            if !collisions.horizontal() {
                let rect = self.rect();
                ctx.particles
                    .spawn_dash_trail(self.dash_kind.particle(), rect, ctx.rng);
            }
            false
        } else if self.air_time > buffer {
            if self.body.velocity.y < 0.0 {
                self.set_action(PlayerAction::Jump);
                if self.air_jumping > 0 && self.air_jumping < Self::WING_DRIFT_TICKS {
                    let rect = self.rect();
                    ctx.particles.spawn_wing_drift(rect, ctx.rng);
                }
            } else {
                self.set_action(PlayerAction::Fall);
            }
            false
        } else if move_x != 0.0 && !collisions.horizontal() {
            self.set_action(PlayerAction::Run);
            self.running_time += 1;

            if self.wall_jump_timer % t.run_particle_delay == 0.0 {
                let feet = to_vec2(self.rect().mid_bottom());
                ctx.particles.spawn_run_dust(feet, ctx.rng);
            }

            if self.running_time % Self::RUN_SFX_LEN == 5 {
                match ctx.tilemap.tile_below(self.body.pos).map(|tile| tile.kind) {
                    Some(TileKind::Grass) => ctx.audio.play(SoundId::RunGrass),
                    Some(TileKind::Stone) => ctx.audio.play(SoundId::RunStone),
                    _ => {}
                }
            }
            false
        } else if self.holding_up {
            self.looking_up = true;
            self.set_action(PlayerAction::LookUp);
            true
        } else if self.holding_down {
            self.looking_down = true;
            self.set_action(PlayerAction::LookDown);
            true
        } else {
            self.set_action(PlayerAction::Idle);
            true
        }
    }

    fn update_falling(&mut self, audio: &mut AudioQueue) {
        let t = self.tuning;
        let vy = self.body.velocity.y;
        let tick_rate = TICK_RATE as i32;

        if vy > 0.0 {
            self.falling_time += 1;
        }
        if vy < 0.0 || self.air_time < t.airtime_buffer || self.sliding_time > 0 {
            self.falling_time = 0;
        }
        if self.falling_time < tick_rate {
            self.set_falling_volume(audio, 0.0);
        }
        if self.falling_time == tick_rate {
            // Starts silent and ramps up below
            audio.play_at(SoundId::Falling, self.falling_volume);
            self.falling_playing = true;
        }
        if self.falling_time >= tick_rate && vy > 0.0 {
            let volume = (self.falling_volume + 0.01).min(t.max_falling_volume);
            self.set_falling_volume(audio, volume);
        }
    }

    fn set_falling_volume(&mut self, audio: &mut AudioQueue, volume: f32) {
        if self.falling_volume != volume {
            self.falling_volume = volume;
            audio.set_volume(SoundId::Falling, volume);
        }
    }

    fn stop_falling_sound(&mut self, audio: &mut AudioQueue) {
        if self.falling_playing {
            audio.stop(SoundId::Falling);
            self.falling_playing = false;
        }
    }

    fn stop_wall_slide_sound(&mut self, audio: &mut AudioQueue) {
        if self.wall_slide_playing {
            audio.stop(SoundId::WallSlide);
            self.wall_slide_playing = false;
        }
    }

    fn restore_mobility(&mut self) {
        self.jumps = self.tuning.air_jumps;
        self.dashes = self.tuning.air_dashes;
        self.air_jumping = 0;
    }

    /// Try to jump: wall jump, grounded jump or wing jump, in that order.
    /// Returns true if the player left the ground.
    pub fn jump(&mut self, ctx: &mut PlayerContext<'_>) -> bool {
        if !self.can_move {
            return false;
        }
        let t = self.tuning;
        let buffer = t.airtime_buffer;

        if self.wall_slide_timer < t.wall_jump_buffer
            && self.has(Ability::Claw)
            && self.wall_jump_timer > (t.wall_jump_buffer + 4) as f32
        {
            self.stop_wall_slide_sound(ctx.audio);
            ctx.audio.play(SoundId::WallJump);

            let rect = self.rect();
            let corner = if self.wall_slide_right {
                self.wall_jump_right = false;
                rect.bottom_right()
            } else {
                self.wall_jump_right = true;
                rect.bottom_left()
            };
            self.wall_jump_timer = 0.0;
            self.body.velocity.y = t.wall_jump_velocity;
            self.air_time = buffer + 1;
            ctx.particles.spawn_wall_jump_dust(to_vec2(corner), ctx.rng);
            log::debug!("Wall jump (right: {})", self.wall_jump_right);
            return true;
        }

        if self.jumps == 0 || self.dash_timer.abs() >= buffer as f32 {
            return false;
        }

        if self.air_time > buffer * 2 {
            if !self.has(Ability::Wings) {
                return false;
            }
            self.jumps = (self.jumps - 1).min(0);
            self.body.velocity.y = t.air_jump_velocity;
            self.air_jumping = 1;
            ctx.audio.play(SoundId::Wings);
            ctx.particles.spawn_wing_burst(self.rect(), self.body.flip);
            log::debug!("Wing jump");
        } else {
            self.body.velocity.y = t.jump_velocity;
            ctx.audio.play(SoundId::Jump);
            let feet = to_vec2(self.rect().mid_bottom());
            ctx.particles.spawn_jump_dust(feet, ctx.rng);
        }

        self.air_time = buffer + 1;
        true
    }

    /// Cut the jump short when the button is released
    pub fn jump_release(&mut self) {
        let t = self.tuning;
        if self.body.velocity.y < 0.0 {
            if self.wall_jump_timer > t.wall_jump_cutoff {
                self.body.velocity.y /= t.variable_jump_shear;
            } else {
                self.body.velocity.y /= t.variable_jump_shear / 4.0;
            }
            self.wall_jump_timer *= 1.5;
            self.body.gravity = t.gravity;
            self.air_jumping = 0;
        }
    }

    /// Try to dash. Off a wall the dash goes away from it; right after a wall
    /// jump it follows the held direction; otherwise it follows the facing.
    pub fn dash(&mut self, ctx: &mut PlayerContext<'_>) -> bool {
        let t = self.tuning;
        if !self.can_move
            || !self.has(Ability::Dash)
            || self.dashes == 0
            || self.is_dashing()
            || self.dash_cooldown_timer <= t.dash_cooldown_ticks
        {
            return false;
        }

        let long_slide = self.sliding_time > t.airtime_buffer + 2;
        let settled = self.wall_jump_timer > t.wall_jump_buffer as f32;
        let flip = self.body.flip;

        let dash_left = (long_slide && self.wall_slide_right && settled)
            || (!long_slide && flip && settled)
            || (!settled && self.holding_left);
        let dash_right = (long_slide && !self.wall_slide_right && settled)
            || (!long_slide && !flip && settled)
            || (!settled && self.holding_right);

        let right = if dash_left {
            false
        } else if dash_right {
            true
        } else {
            return false;
        };

        self.dash_timer = if right { t.dash_ticks } else { -t.dash_ticks };
        self.dashes = (self.dashes - 1).min(0);
        self.sliding_time = 0;
        self.wall_slide_timer = t.wall_jump_buffer;
        self.dash_cooldown_timer = -(t.dash_ticks as i32);
        self.body.velocity.y = 0.0;

        self.dash_kind = if self.has(Ability::Cloak) {
            self.cloak_timer = 1;
            DashKind::Cloak
        } else {
            DashKind::Dash
        };

        ctx.particles
            .spawn_dash_burst(self.dash_kind.particle(), self.rect(), right);
        ctx.audio.play(self.dash_kind.sound());
        log::debug!("{:?} (right: {})", self.dash_kind, right);
        true
    }

    /// Freeze on taking damage: burst of particles, most sounds cut
    pub fn hitstun(&mut self, ctx: &mut PlayerContext<'_>) {
        self.set_action(PlayerAction::Hitstun);
        for sound in [
            SoundId::Land,
            SoundId::Falling,
            SoundId::Wings,
            SoundId::Cloak,
            SoundId::RunGrass,
            SoundId::RunStone,
            SoundId::WallSlide,
        ] {
            ctx.audio.stop(sound);
        }
        ctx.audio.play(SoundId::Hitstun);
        self.falling_playing = false;
        self.wall_slide_playing = false;
        self.can_move = false;
        self.falling_time = 0;

        let center = to_vec2(self.rect().center());
        ctx.particles
            .spawn_hitstun_burst(center, self.tuning.hitstun_particles, ctx.rng);
        log::debug!("Hitstun at {:?}", self.body.pos);
    }

    /// Teleport to the spawn point while the screen is black
    pub fn death_warp(&mut self, spawn: Vec2) {
        self.body.pos = spawn + Vec2::new(0.0, 1.0);
        self.body.velocity.y = 0.0;
        self.dash_timer = 0.0;
        self.body.gravity = self.tuning.gravity;
        self.deaths += 1;
        self.set_action(PlayerAction::Kneel);
        log::info!("Death warp to {:?} (deaths: {})", spawn, self.deaths);
    }

    /// Point three particles at the nearest of `grubs`. False when the player
    /// lacks the ability, cannot move, or there is nothing to point at.
    pub fn grub_pointer(
        &mut self,
        ctx: &mut PlayerContext<'_>,
        grubs: impl IntoIterator<Item = Rect>,
    ) -> bool {
        if !self.can_move || !self.has(Ability::GrubFinder) {
            return false;
        }

        let center = to_vec2(self.rect().center());
        let nearest = grubs
            .into_iter()
            .map(|grub| to_vec2(grub.center()))
            .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)));
        let Some(target) = nearest else {
            return false;
        };

        let direction = (target - center).normalize_or_zero();
        ctx.audio.play(SoundId::Grubfather);
        ctx.particles.spawn_grub_pointer(center, direction);
        true
    }
}
