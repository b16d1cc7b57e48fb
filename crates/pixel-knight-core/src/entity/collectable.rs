//! Grubs, respawn benches, ability pickups and level exits
//!
//! Collectables come from `spawners` tiles in the map. They only react to the
//! player's rect; what a touch means for the game is reported back as a
//! [`CollectableEvent`].

use glam::{IVec2, Vec2};

use crate::animation::{Animation, AnimationSpec};
use crate::audio::{AudioQueue, SoundId};
use crate::geometry::{to_vec2, Rect};
use crate::progression::Ability;
use crate::rng::{EffectRng, GameRng};

/// Spawner variant that marks the player start; it never becomes a collectable
pub const PLAYER_SPAWN_VARIANT: u32 = 2;

/// Distance at which a grub notices the player
pub const GRUB_ALERT_RADIUS: f32 = 48.0;

/// Ticks between repeated "requires" messages from the same exit
const EXIT_MESSAGE_COOLDOWN: i32 = 180;

/// Roughly one sad grub noise every ten seconds
const SAD_IDLE_CHANCE: i32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectableKind {
    Respawn,
    Grub,
    Pickup(Ability),
    Exit,
}

impl CollectableKind {
    /// Map a spawner tile variant to a collectable
    pub fn from_spawner(variant: u32) -> Option<Self> {
        match variant {
            0 => Some(CollectableKind::Respawn),
            1 => Some(CollectableKind::Grub),
            3 => Some(CollectableKind::Pickup(Ability::Cloak)),
            4 => Some(CollectableKind::Pickup(Ability::Dash)),
            5 => Some(CollectableKind::Pickup(Ability::Claw)),
            6 => Some(CollectableKind::Pickup(Ability::Wings)),
            7 => Some(CollectableKind::Exit),
            8 => Some(CollectableKind::Pickup(Ability::GrubFinder)),
            _ => None,
        }
    }

    /// Whether collecting it is remembered across reloads
    pub fn is_persistent(self) -> bool {
        matches!(self, CollectableKind::Grub | CollectableKind::Pickup(_))
    }

    fn idle_spec(self) -> AnimationSpec {
        match self {
            CollectableKind::Respawn | CollectableKind::Grub | CollectableKind::Exit => {
                AnimationSpec::looping(4, 8)
            }
            CollectableKind::Pickup(_) => AnimationSpec::looping(4, 6),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectableState {
    #[default]
    Idle,
    /// Grub noticed the player
    Alert,
    /// Grub is being freed
    Collecting,
}

/// What a collectable asks the game to do after a touch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollectableEvent {
    GrubRescued { pos: Vec2 },
    SpawnPoint(Vec2),
    AbilityGranted { ability: Ability, pos: Vec2 },
    ExitReached,
}

#[derive(Debug, Clone)]
pub struct Collectable {
    pub kind: CollectableKind,
    pub pos: Vec2,
    pub size: IVec2,
    pub state: CollectableState,
    pub animation: Animation,
    /// Ticks since the grub was collected, 0 while uncollected
    pub collect_timer: i32,
    /// Bench currently touched
    pub active: bool,
    /// Ready to be removed
    pub done: bool,
    exit_cooldown: i32,
}

impl Collectable {
    const GRUB_ALERT: AnimationSpec = AnimationSpec::looping(4, 5);
    const GRUB_COLLECT: AnimationSpec = AnimationSpec::once(6, 8);

    pub fn new(kind: CollectableKind, pos: Vec2, tile_size: i32) -> Self {
        Self {
            kind,
            pos,
            size: IVec2::splat(tile_size),
            state: CollectableState::Idle,
            animation: kind.idle_spec().start(),
            collect_timer: 0,
            active: false,
            done: false,
            exit_cooldown: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos(self.pos, self.size)
    }

    /// Grub that can still be pointed at by the grub finder
    pub fn is_uncollected_grub(&self) -> bool {
        self.kind == CollectableKind::Grub && self.collect_timer == 0
    }

    fn set_state(&mut self, state: CollectableState, spec: AnimationSpec) {
        if self.state != state {
            self.state = state;
            self.animation = spec.start();
        }
    }

    /// Advance one tick against the player's rect
    pub fn update(
        &mut self,
        player: Rect,
        audio: &mut AudioQueue,
        rng: &mut GameRng,
    ) -> Option<CollectableEvent> {
        self.animation.update();
        let touching = self.rect().collides(&player);

        match self.kind {
            CollectableKind::Grub => self.update_grub(player, touching, audio, rng),
            CollectableKind::Respawn => {
                let event = (touching && !self.active).then_some(CollectableEvent::SpawnPoint(self.pos));
                self.active = touching;
                event
            }
            CollectableKind::Pickup(ability) => {
                if !touching {
                    return None;
                }
                audio.play(SoundId::AbilityPickup);
                audio.play(SoundId::AbilityInfo);
                self.done = true;
                Some(CollectableEvent::AbilityGranted {
                    ability,
                    pos: self.pos,
                })
            }
            CollectableKind::Exit => {
                if self.exit_cooldown > 0 {
                    self.exit_cooldown -= 1;
                }
                if touching && self.exit_cooldown == 0 {
                    self.exit_cooldown = EXIT_MESSAGE_COOLDOWN;
                    return Some(CollectableEvent::ExitReached);
                }
                None
            }
        }
    }

    fn update_grub(
        &mut self,
        player: Rect,
        touching: bool,
        audio: &mut AudioQueue,
        rng: &mut GameRng,
    ) -> Option<CollectableEvent> {
        if self.collect_timer > 0 {
            self.collect_timer += 1;
            if self.animation.done {
                audio.play(SoundId::GrubBurrow);
                self.done = true;
            }
            return None;
        }

        if touching {
            self.collect_timer = 1;
            self.set_state(CollectableState::Collecting, Self::GRUB_COLLECT);
            audio.play(SoundId::GrubBreak);
            let free = match rng.int_inclusive(1, 3) {
                1 => SoundId::GrubFree1,
                2 => SoundId::GrubFree2,
                _ => SoundId::GrubFree3,
            };
            audio.play(free);
            return Some(CollectableEvent::GrubRescued { pos: self.pos });
        }

        let distance = to_vec2(self.rect().center()).distance(to_vec2(player.center()));
        if distance < GRUB_ALERT_RADIUS {
            if self.state != CollectableState::Alert {
                audio.play(SoundId::GrubAlert);
            }
            self.set_state(CollectableState::Alert, Self::GRUB_ALERT);
        } else {
            self.set_state(CollectableState::Idle, self.kind.idle_spec());
            if rng.int_inclusive(1, SAD_IDLE_CHANCE) == 1 {
                let sad = if rng.int_inclusive(0, 1) == 0 {
                    SoundId::GrubSadIdle1
                } else {
                    SoundId::GrubSadIdle2
                };
                audio.play(sad);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn far_away() -> Rect {
        Rect::new(1000, 1000, 10, 14)
    }

    #[test]
    fn test_spawner_variants() {
        assert_eq!(CollectableKind::from_spawner(0), Some(CollectableKind::Respawn));
        assert_eq!(CollectableKind::from_spawner(1), Some(CollectableKind::Grub));
        assert_eq!(CollectableKind::from_spawner(PLAYER_SPAWN_VARIANT), None);
        assert_eq!(
            CollectableKind::from_spawner(5),
            Some(CollectableKind::Pickup(Ability::Claw))
        );
        assert_eq!(CollectableKind::from_spawner(7), Some(CollectableKind::Exit));
        assert_eq!(CollectableKind::from_spawner(42), None);
    }

    #[test]
    fn test_grub_alerts_then_rescues() {
        let mut audio = AudioQueue::new();
        let mut rng = seeded(3);
        let mut grub = Collectable::new(CollectableKind::Grub, Vec2::new(100.0, 100.0), 16);

        assert_eq!(grub.update(far_away(), &mut audio, &mut rng), None);
        assert_eq!(grub.state, CollectableState::Idle);

        audio.drain();
        let nearby = Rect::new(70, 100, 10, 14);
        assert_eq!(grub.update(nearby, &mut audio, &mut rng), None);
        assert_eq!(grub.state, CollectableState::Alert);
        assert!(audio.contains_play(SoundId::GrubAlert));

        let touching = Rect::new(105, 100, 10, 14);
        let event = grub.update(touching, &mut audio, &mut rng);
        assert_eq!(
            event,
            Some(CollectableEvent::GrubRescued {
                pos: Vec2::new(100.0, 100.0)
            })
        );
        assert!(audio.contains_play(SoundId::GrubBreak));
        assert!(!grub.is_uncollected_grub());

        // Touching again never double counts
        for _ in 0..100 {
            assert_eq!(grub.update(touching, &mut audio, &mut rng), None);
        }
        assert!(grub.done);
    }

    #[test]
    fn test_bench_triggers_once_per_visit() {
        let mut audio = AudioQueue::new();
        let mut rng = seeded(3);
        let mut bench = Collectable::new(CollectableKind::Respawn, Vec2::new(0.0, 0.0), 16);
        let on_bench = Rect::new(2, 2, 10, 14);

        assert_eq!(
            bench.update(on_bench, &mut audio, &mut rng),
            Some(CollectableEvent::SpawnPoint(Vec2::ZERO))
        );
        assert_eq!(bench.update(on_bench, &mut audio, &mut rng), None);
        bench.update(far_away(), &mut audio, &mut rng);
        assert!(bench.update(on_bench, &mut audio, &mut rng).is_some());
    }

    #[test]
    fn test_pickup_grants_and_finishes() {
        let mut audio = AudioQueue::new();
        let mut rng = seeded(3);
        let kind = CollectableKind::Pickup(Ability::Wings);
        let mut pickup = Collectable::new(kind, Vec2::new(32.0, 0.0), 16);

        assert_eq!(pickup.update(far_away(), &mut audio, &mut rng), None);
        let event = pickup.update(Rect::new(30, 0, 10, 14), &mut audio, &mut rng);
        assert_eq!(
            event,
            Some(CollectableEvent::AbilityGranted {
                ability: Ability::Wings,
                pos: Vec2::new(32.0, 0.0)
            })
        );
        assert!(pickup.done);
        assert!(audio.contains_play(SoundId::AbilityPickup));
    }

    #[test]
    fn test_exit_is_rate_limited() {
        let mut audio = AudioQueue::new();
        let mut rng = seeded(3);
        let mut exit = Collectable::new(CollectableKind::Exit, Vec2::ZERO, 16);
        let on_exit = Rect::new(0, 0, 10, 14);

        assert_eq!(
            exit.update(on_exit, &mut audio, &mut rng),
            Some(CollectableEvent::ExitReached)
        );
        let repeats = (0..EXIT_MESSAGE_COOLDOWN)
            .filter_map(|_| exit.update(on_exit, &mut audio, &mut rng))
            .count();
        assert_eq!(repeats, 1);
    }
}
