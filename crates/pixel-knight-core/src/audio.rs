//! Sound cues emitted by the simulation
//!
//! The core never touches an audio device. Gameplay code pushes [`AudioCue`]s
//! into an [`AudioQueue`] and the frontend drains it once per frame.

use serde::{Deserialize, Serialize};

/// Every sound effect the game can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    RunGrass,
    RunStone,
    Jump,
    Land,
    LandHard,
    Falling,
    Wings,
    Dash,
    Cloak,
    Hitstun,
    WallJump,
    WallSlide,
    MantisClaw,
    GrubFree1,
    GrubFree2,
    GrubFree3,
    GrubBreak,
    GrubBurrow,
    GrubAlert,
    GrubSadIdle1,
    GrubSadIdle2,
    Grubfather,
    AbilityPickup,
    AbilityInfo,
}

impl SoundId {
    /// Mixer volume the effect is played at
    pub fn default_volume(self) -> f32 {
        match self {
            SoundId::RunGrass | SoundId::RunStone => 0.2,
            SoundId::Jump => 0.15,
            SoundId::Land => 0.08,
            SoundId::LandHard => 0.2,
            SoundId::Falling => 0.2,
            SoundId::Wings => 0.2,
            SoundId::Dash => 0.2,
            SoundId::Cloak => 0.1,
            SoundId::Hitstun => 0.2,
            SoundId::WallJump => 0.18,
            SoundId::WallSlide => 0.25,
            SoundId::MantisClaw => 0.15,
            SoundId::GrubFree1 | SoundId::GrubFree2 => 0.2,
            SoundId::GrubFree3 => 0.3,
            SoundId::GrubBreak => 0.15,
            SoundId::GrubBurrow => 0.4,
            SoundId::GrubAlert => 0.3,
            SoundId::GrubSadIdle1 | SoundId::GrubSadIdle2 => 0.2,
            SoundId::Grubfather => 0.3,
            SoundId::AbilityPickup => 0.3,
            SoundId::AbilityInfo => 0.1,
        }
    }

    /// File stem the frontend would look the effect up by
    pub fn file_stem(self) -> &'static str {
        match self {
            SoundId::RunGrass => "run_grass",
            SoundId::RunStone => "run_stone",
            SoundId::Jump => "jump",
            SoundId::Land => "land",
            SoundId::LandHard => "land_hard",
            SoundId::Falling => "falling",
            SoundId::Wings => "wings",
            SoundId::Dash => "dash",
            SoundId::Cloak => "cloak",
            SoundId::Hitstun => "damage",
            SoundId::WallJump => "wall_jump",
            SoundId::WallSlide => "wall_slide",
            SoundId::MantisClaw => "mantis_claw",
            SoundId::GrubFree1 => "grub_free_1",
            SoundId::GrubFree2 => "grub_free_2",
            SoundId::GrubFree3 => "grub_free_3",
            SoundId::GrubBreak => "grub_break",
            SoundId::GrubBurrow => "grub_burrow",
            SoundId::GrubAlert => "grub_alert",
            SoundId::GrubSadIdle1 => "grub_sad_idle_1",
            SoundId::GrubSadIdle2 => "grub_sad_idle_2",
            SoundId::Grubfather => "grubfather_1",
            SoundId::AbilityPickup => "ability_pickup_boom",
            SoundId::AbilityInfo => "ability_info",
        }
    }
}

/// A request for the audio frontend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCue {
    Play(SoundId),
    /// Play with an explicit volume (used by the falling wind ramp)
    PlayAt(SoundId, f32),
    SetVolume(SoundId, f32),
    Stop(SoundId),
    /// Start looping background music at the given volume
    Music(&'static str, f32),
}

/// Per-frame queue of audio cues
#[derive(Debug, Default)]
pub struct AudioQueue {
    cues: Vec<AudioCue>,
}

impl AudioQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&mut self, sound: SoundId) {
        self.cues.push(AudioCue::Play(sound));
    }

    pub fn play_at(&mut self, sound: SoundId, volume: f32) {
        self.cues.push(AudioCue::PlayAt(sound, volume));
    }

    pub fn set_volume(&mut self, sound: SoundId, volume: f32) {
        self.cues.push(AudioCue::SetVolume(sound, volume));
    }

    pub fn stop(&mut self, sound: SoundId) {
        self.cues.push(AudioCue::Stop(sound));
    }

    pub fn music(&mut self, track: &'static str, volume: f32) {
        self.cues.push(AudioCue::Music(track, volume));
    }

    /// Take every queued cue, leaving the queue empty
    pub fn drain(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Whether a play request for `sound` is queued (test helper for callers)
    pub fn contains_play(&self, sound: SoundId) -> bool {
        self.cues.iter().any(|cue| {
            matches!(cue, AudioCue::Play(s) | AudioCue::PlayAt(s, _) if *s == sound)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = AudioQueue::new();
        queue.play(SoundId::Jump);
        queue.stop(SoundId::Falling);
        assert_eq!(queue.len(), 2);

        let cues = queue.drain();
        assert_eq!(cues, vec![AudioCue::Play(SoundId::Jump), AudioCue::Stop(SoundId::Falling)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_contains_play_matches_volume_variant() {
        let mut queue = AudioQueue::new();
        queue.play_at(SoundId::Falling, 0.0);
        assert!(queue.contains_play(SoundId::Falling));
        assert!(!queue.contains_play(SoundId::Jump));
    }

    #[test]
    fn test_volumes_are_mixer_range() {
        for sound in [SoundId::Jump, SoundId::GrubBurrow, SoundId::Land, SoundId::AbilityInfo] {
            let volume = sound.default_volume();
            assert!(volume > 0.0 && volume <= 1.0);
        }
    }
}
