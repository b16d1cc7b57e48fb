//! Visual-only particle system for dust, dash trails, wing bursts and the like.
//! Particles never collide; each one lives exactly as long as its animation.

use glam::Vec2;

use crate::animation::{Animation, AnimationSpec};
use crate::geometry::{to_vec2, Rect};
use crate::rng::EffectRng;

/// Offset from the player position that follow particles are drawn at
pub const FOLLOW_OFFSET: Vec2 = Vec2::new(5.0, 5.0);

const DASH_PARTICLE_VEL: f32 = 1.5;
const DASH_TRAIL_VARIANCE: f32 = 0.3;
const HITSTUN_PARTICLE_VEL: f32 = 1.0;

/// Particle look, which also fixes its animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Run,
    Slide,
    LongSlide,
    Dash,
    Cloak,
    Wings,
    Grub,
}

impl ParticleKind {
    pub fn spec(self) -> AnimationSpec {
        match self {
            ParticleKind::Run => AnimationSpec::once(4, 5),
            ParticleKind::Slide => AnimationSpec::once(4, 2),
            ParticleKind::LongSlide => AnimationSpec::once(4, 6),
            ParticleKind::Dash | ParticleKind::Cloak => AnimationSpec::once(4, 3),
            ParticleKind::Wings => AnimationSpec::once(5, 3),
            ParticleKind::Grub => AnimationSpec::once(6, 4),
        }
    }

    /// Base RGBA color
    pub fn color(self) -> [u8; 4] {
        match self {
            ParticleKind::Run => [196, 186, 160, 255],
            ParticleKind::Slide => [220, 220, 210, 255],
            ParticleKind::LongSlide => [240, 240, 255, 255],
            ParticleKind::Dash => [235, 235, 245, 255],
            ParticleKind::Cloak => [40, 30, 60, 255],
            ParticleKind::Wings => [250, 250, 255, 255],
            ParticleKind::Grub => [120, 230, 140, 255],
        }
    }

    /// Edge length of the square the renderer draws
    pub fn size(self) -> i32 {
        match self {
            ParticleKind::Run | ParticleKind::Slide | ParticleKind::LongSlide => 2,
            ParticleKind::Grub => 3,
            ParticleKind::Dash | ParticleKind::Cloak => 4,
            ParticleKind::Wings => 8,
        }
    }
}

/// A single visual particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub animation: Animation,
    pub flip: bool,
    /// Drawn relative to the player instead of `pos`
    pub follow_player: bool,
    /// Ticks over which the particle fades before its animation ends
    pub fade_out: u32,
}

impl Particle {
    pub fn new(kind: ParticleKind, pos: Vec2, velocity: Vec2) -> Self {
        Self {
            kind,
            pos,
            velocity,
            animation: kind.spec().start(),
            flip: false,
            follow_player: false,
            fade_out: 0,
        }
    }

    pub fn with_frame(mut self, frame: u32) -> Self {
        self.animation = Animation::starting_at(self.kind.spec(), frame);
        self
    }

    pub fn flipped(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    pub fn following_player(mut self) -> Self {
        self.follow_player = true;
        self
    }

    pub fn fading(mut self, ticks: u32) -> Self {
        self.fade_out = ticks;
        self
    }

    /// Advance one tick. Returns true once the particle should be removed,
    /// which is the tick after its animation finished.
    pub fn update(&mut self) -> bool {
        let kill = self.animation.done;
        self.pos += self.velocity;
        self.animation.update();
        kill
    }

    /// Where to draw the particle's center
    pub fn render_pos(&self, player_pos: Vec2) -> Vec2 {
        if self.follow_player {
            player_pos + FOLLOW_OFFSET
        } else {
            self.pos
        }
    }

    /// Opacity, thinning out as the animation plays
    pub fn alpha(&self) -> u8 {
        let mut alpha = 1.0 - 0.5 * self.animation.progress();
        if self.fade_out > 0 {
            let spec = self.animation.spec();
            let remaining = spec.total_ticks().saturating_sub(self.animation.frame + 1);
            alpha *= (remaining as f32 / self.fade_out as f32).min(1.0);
        }
        (alpha.clamp(0.0, 1.0) * 255.0) as u8
    }
}

/// Manages a collection of visual particles
#[derive(Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystem {
    pub const DEFAULT_MAX_PARTICLES: usize = 2000;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_PARTICLES)
    }

    pub fn with_capacity(max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles.min(Self::DEFAULT_MAX_PARTICLES)),
            max_particles: max_particles.max(1),
        }
    }

    /// Update all particles, removing the ones whose animation has ended
    pub fn update(&mut self) {
        self.particles.retain_mut(|p| !p.update());
    }

    /// Spawn a single particle
    pub fn spawn(&mut self, particle: Particle) {
        // If at capacity, remove oldest particle
        if self.particles.len() >= self.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Dust kicked up on landing; a hard landing throws a wide plume
    pub fn spawn_landing(&mut self, feet: Vec2, hard: bool, rng: &mut impl EffectRng) {
        if hard {
            for _ in 0..40 {
                let velocity = Vec2::new(rng.uniform(-2.5, 2.5), rng.uniform(0.0, 0.5));
                self.spawn(Particle::new(ParticleKind::Slide, feet, velocity));
            }
        } else {
            for _ in 0..10 {
                let velocity = Vec2::new(rng.uniform(-0.5, 0.5), rng.uniform(0.1, 0.3));
                self.spawn(Particle::new(ParticleKind::Run, feet, velocity));
            }
        }
    }

    /// Dust plume around a grounded jump
    pub fn spawn_jump_dust(&mut self, feet: Vec2, rng: &mut impl EffectRng) {
        for _ in 0..6 {
            let velocity = Vec2::new(rng.uniform(-0.4, 0.4), rng.uniform(-0.4, -0.1));
            self.spawn(Particle::new(ParticleKind::Run, feet, velocity));
        }
    }

    /// Puff off the wall on a wall jump
    pub fn spawn_wall_jump_dust(&mut self, corner: Vec2, rng: &mut impl EffectRng) {
        for _ in 0..5 {
            let velocity = Vec2::new(rng.uniform(-0.1, 0.1), rng.uniform(-0.1, 0.3));
            self.spawn(Particle::new(ParticleKind::Run, corner, velocity));
        }
    }

    /// Single footstep puff while running
    pub fn spawn_run_dust(&mut self, feet: Vec2, rng: &mut impl EffectRng) {
        let velocity = Vec2::new(
            rng.int_inclusive(-1, 1) as f32 / 3.0,
            rng.int_inclusive(-1, 1) as f32 / 5.0,
        );
        let frame = rng.int_inclusive(0, 1) as u32;
        self.spawn(Particle::new(ParticleKind::Run, feet, velocity).with_frame(frame));
    }

    /// Scrape falling off the claw while wall sliding
    pub fn spawn_wall_slide(&mut self, contact: Vec2, rng: &mut impl EffectRng) {
        let velocity = Vec2::new(0.0, rng.int_inclusive(1, 4) as f32 / 2.0);
        let frame = rng.int_inclusive(0, 2) as u32;
        self.spawn(Particle::new(ParticleKind::Slide, contact, velocity).with_frame(frame));
    }

    /// Three particles head to toe, drifting against the dash direction
    pub fn spawn_dash_burst(&mut self, kind: ParticleKind, body: Rect, dash_right: bool) {
        let velocity = if dash_right {
            Vec2::new(-DASH_PARTICLE_VEL, 0.0)
        } else {
            Vec2::new(DASH_PARTICLE_VEL, 0.0)
        };
        for pos in [body.center(), body.mid_top(), body.mid_bottom()] {
            self.spawn(Particle::new(kind, to_vec2(pos), velocity));
        }
    }

    /// Stationary afterimage left behind every dash tick
    pub fn spawn_dash_trail(&mut self, kind: ParticleKind, body: Rect, rng: &mut impl EffectRng) {
        let jitter = rng.int_inclusive(-1, 1) as f32 / DASH_TRAIL_VARIANCE;
        let pos = Vec2::new(body.center_x() as f32, body.center_y() as f32 + jitter);
        self.spawn(Particle::new(kind, pos, Vec2::ZERO));
    }

    /// Wing flap that follows the player plus six feathers spraying down
    pub fn spawn_wing_burst(&mut self, body: Rect, flip: bool) {
        let center = to_vec2(body.center());
        self.spawn(
            Particle::new(ParticleKind::Wings, center, Vec2::ZERO)
                .flipped(flip)
                .following_player(),
        );

        let left = to_vec2(body.mid_left());
        let right = to_vec2(body.mid_right());
        let feathers = [
            (center, Vec2::new(-0.1, 0.3)),
            (center, Vec2::new(0.1, 0.3)),
            (left + Vec2::new(2.0, 0.0), Vec2::new(-0.2, 0.2)),
            (right + Vec2::new(-2.0, 0.0), Vec2::new(0.2, 0.2)),
            (left, Vec2::new(-0.4, 0.1)),
            (right, Vec2::new(0.4, 0.1)),
        ];
        for (pos, velocity) in feathers {
            self.spawn(Particle::new(ParticleKind::LongSlide, pos, velocity));
        }
    }

    /// Feathers drifting off the player while rising from a double jump
    pub fn spawn_wing_drift(&mut self, body: Rect, rng: &mut impl EffectRng) {
        let pos = Vec2::new(
            (body.center_x() + rng.int_inclusive(-10, 10)) as f32,
            body.center_y() as f32,
        );
        let velocity = Vec2::new(rng.uniform(-0.1, 0.1), rng.uniform(0.0, 0.2));
        self.spawn(Particle::new(ParticleKind::LongSlide, pos, velocity));
    }

    /// Burst of shadow on taking damage
    pub fn spawn_hitstun_burst(&mut self, center: Vec2, count: u32, rng: &mut impl EffectRng) {
        for _ in 0..count {
            let velocity =
                Vec2::new(rng.uniform(-5.0, 5.0), rng.uniform(-5.0, 5.0)) * HITSTUN_PARTICLE_VEL;
            self.spawn(Particle::new(ParticleKind::Cloak, center, velocity));
        }
    }

    /// Three staggered particles flying toward `direction` (normalized)
    pub fn spawn_grub_pointer(&mut self, origin: Vec2, direction: Vec2) {
        for i in 0..3u32 {
            let velocity = direction * (i + 1) as f32 * 0.75;
            self.spawn(
                Particle::new(ParticleKind::Grub, origin, velocity)
                    .with_frame(4 - i)
                    .fading(5),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    #[test]
    fn test_particle_killed_the_tick_after_done() {
        let mut particle = Particle::new(ParticleKind::Slide, Vec2::ZERO, Vec2::new(1.0, 0.0));
        let total = ParticleKind::Slide.spec().total_ticks();

        // Needs total - 1 updates to finish, then one more to report the kill
        for _ in 0..total - 1 {
            assert!(!particle.update());
        }
        assert!(particle.animation.done);
        assert!(particle.update());
        assert_eq!(particle.pos, Vec2::new(total as f32, 0.0));
    }

    #[test]
    fn test_system_respects_cap() {
        let mut system = ParticleSystem::with_capacity(10);
        for i in 0..25 {
            system.spawn(Particle::new(ParticleKind::Run, Vec2::new(i as f32, 0.0), Vec2::ZERO));
        }
        assert_eq!(system.len(), 10);
        // Oldest are dropped first
        assert_eq!(system.iter().next().map(|p| p.pos.x), Some(15.0));
    }

    #[test]
    fn test_update_culls_finished_particles() {
        let mut system = ParticleSystem::new();
        let mut rng = seeded(7);
        system.spawn_landing(Vec2::new(10.0, 20.0), false, &mut rng);
        assert_eq!(system.len(), 10);

        for _ in 0..ParticleKind::Run.spec().total_ticks() + 1 {
            system.update();
        }
        assert!(system.is_empty());
    }

    #[test]
    fn test_hard_landing_spawns_forty() {
        let mut system = ParticleSystem::new();
        system.spawn_landing(Vec2::ZERO, true, &mut seeded(1));
        assert_eq!(system.len(), 40);
        assert!(system.iter().all(|p| p.kind == ParticleKind::Slide));
    }

    #[test]
    fn test_dash_burst_drifts_backwards() {
        let mut system = ParticleSystem::new();
        system.spawn_dash_burst(ParticleKind::Dash, Rect::new(0, 0, 10, 14), true);
        assert_eq!(system.len(), 3);
        assert!(system.iter().all(|p| p.velocity.x < 0.0));
    }

    #[test]
    fn test_follow_particles_track_player() {
        let mut system = ParticleSystem::new();
        system.spawn_wing_burst(Rect::new(0, 0, 10, 14), true);
        let wings = system
            .iter()
            .find(|p| p.kind == ParticleKind::Wings)
            .expect("wing particle");
        assert!(wings.flip);
        assert_eq!(wings.render_pos(Vec2::new(100.0, 50.0)), Vec2::new(105.0, 55.0));
    }

    #[test]
    fn test_grub_pointer_fades_out() {
        let mut system = ParticleSystem::new();
        system.spawn_grub_pointer(Vec2::ZERO, Vec2::X);
        let speeds: Vec<f32> = system.iter().map(|p| p.velocity.x).collect();
        assert_eq!(speeds, vec![0.75, 1.5, 2.25]);

        let mut particle = system.iter().next().cloned().expect("particle");
        assert!(particle.alpha() > 200);
        while !particle.animation.done {
            particle.update();
        }
        assert_eq!(particle.alpha(), 0);
    }
}
