//! Audio frontend
//!
//! There is no mixer yet: cues from the simulation are logged and tracked so
//! the debug overlay can show what would be playing.

use std::collections::{HashMap, VecDeque};

use pixel_knight_core::audio::{AudioCue, SoundId};

/// Cues kept for the debug overlay
const RECENT_CUES: usize = 8;

#[derive(Debug, Default)]
pub struct CueLog {
    /// Sounds started with an explicit volume and not stopped yet
    active: HashMap<SoundId, f32>,
    music: Option<(&'static str, f32)>,
    recent: VecDeque<String>,
    total: u64,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle every cue from one frame
    pub fn process(&mut self, cues: impl IntoIterator<Item = AudioCue>) {
        for cue in cues {
            self.handle(cue);
        }
    }

    fn handle(&mut self, cue: AudioCue) {
        self.total += 1;
        let line = match cue {
            AudioCue::Play(sound) => {
                format!("play {} @ {:.2}", sound.file_stem(), sound.default_volume())
            }
            AudioCue::PlayAt(sound, volume) => {
                self.active.insert(sound, volume);
                format!("play {} @ {:.2}", sound.file_stem(), volume)
            }
            AudioCue::SetVolume(sound, volume) => {
                self.active.insert(sound, volume);
                format!("volume {} -> {:.2}", sound.file_stem(), volume)
            }
            AudioCue::Stop(sound) => {
                self.active.remove(&sound);
                format!("stop {}", sound.file_stem())
            }
            AudioCue::Music(track, volume) => {
                self.music = Some((track, volume));
                format!("music {} @ {:.2}", track, volume)
            }
        };

        log::debug!("Audio: {}", line);
        if self.recent.len() == RECENT_CUES {
            self.recent.pop_front();
        }
        self.recent.push_back(line);
    }

    pub fn volume_of(&self, sound: SoundId) -> Option<f32> {
        self.active.get(&sound).copied()
    }

    pub fn music(&self) -> Option<&'static str> {
        self.music.map(|(track, _)| track)
    }

    /// Latest cues, oldest first
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().map(String::as_str)
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_looping_volume() {
        let mut log = CueLog::new();
        log.process([
            AudioCue::PlayAt(SoundId::Falling, 0.0),
            AudioCue::SetVolume(SoundId::Falling, 0.1),
        ]);
        assert_eq!(log.volume_of(SoundId::Falling), Some(0.1));

        log.process([AudioCue::Stop(SoundId::Falling)]);
        assert_eq!(log.volume_of(SoundId::Falling), None);
        assert_eq!(log.total(), 3);
    }

    #[test]
    fn test_recent_is_bounded() {
        let mut log = CueLog::new();
        log.process([AudioCue::Music("music_crossroads", 0.08)]);
        for _ in 0..20 {
            log.process([AudioCue::Play(SoundId::Jump)]);
        }
        assert_eq!(log.recent().count(), RECENT_CUES);
        assert_eq!(log.music(), Some("music_crossroads"));
    }
}
