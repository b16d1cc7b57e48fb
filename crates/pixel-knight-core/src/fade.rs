//! Blackout fade used for death warps and level transitions

/// Alpha change per tick
pub const FADE_SPEED: i32 = 6;

/// Below this alpha a fade in counts as settling
const SETTLE_ALPHA: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeReason {
    Death,
    LevelTransition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadePhase {
    #[default]
    Clear,
    Out(FadeReason),
    In(FadeReason),
}

/// Things the game reacts to while a fade runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeEvent {
    /// First visible frame of a fade out
    FirstFrame(FadeReason),
    /// Screen is fully black
    Black(FadeReason),
    /// First tick of the fade back in
    FadeInStarted(FadeReason),
    /// Last few frames of the fade in
    Settling(FadeReason),
    Finished(FadeReason),
}

#[derive(Debug, Clone, Default)]
pub struct ScreenFade {
    /// Blackout opacity, 0..=255
    pub alpha: i32,
    pub phase: FadePhase,
}

impl ScreenFade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.phase != FadePhase::Clear
    }

    /// Start fading out. Ignored while another fade runs.
    pub fn start(&mut self, reason: FadeReason) -> bool {
        if self.is_active() {
            log::trace!("Fade {:?} ignored, already fading", reason);
            return false;
        }
        log::debug!("Fade out: {:?}", reason);
        self.phase = FadePhase::Out(reason);
        true
    }

    /// Advance one tick, returning what happened in order
    pub fn tick(&mut self) -> Vec<FadeEvent> {
        let mut events = Vec::new();

        if let FadePhase::Out(reason) = self.phase {
            if self.alpha > 0 && self.alpha <= FADE_SPEED {
                events.push(FadeEvent::FirstFrame(reason));
            }
            if self.alpha < 255 {
                self.alpha = (self.alpha + FADE_SPEED).min(255);
            } else {
                events.push(FadeEvent::Black(reason));
                self.phase = FadePhase::In(reason);
            }
        }

        if let FadePhase::In(reason) = self.phase {
            if self.alpha == 255 {
                events.push(FadeEvent::FadeInStarted(reason));
            }
            if self.alpha < SETTLE_ALPHA {
                events.push(FadeEvent::Settling(reason));
            }
            if self.alpha > 0 {
                self.alpha = (self.alpha - FADE_SPEED).max(0);
            } else {
                events.push(FadeEvent::Finished(reason));
                self.phase = FadePhase::Clear;
                log::debug!("Fade finished: {:?}", reason);
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_clear(fade: &mut ScreenFade) -> Vec<FadeEvent> {
        let mut all = Vec::new();
        for _ in 0..1000 {
            all.extend(fade.tick());
            assert!((0..=255).contains(&fade.alpha));
            if !fade.is_active() {
                break;
            }
        }
        all
    }

    #[test]
    fn test_clear_fade_does_nothing() {
        let mut fade = ScreenFade::new();
        assert!(fade.tick().is_empty());
        assert_eq!(fade.alpha, 0);
    }

    #[test]
    fn test_death_fade_event_order() {
        let mut fade = ScreenFade::new();
        assert!(fade.start(FadeReason::Death));
        let events = run_to_clear(&mut fade);

        let reason = FadeReason::Death;
        let first = |event: FadeEvent| events.iter().position(|e| *e == event);
        let hitstun = first(FadeEvent::FirstFrame(reason)).expect("first frame");
        let black = first(FadeEvent::Black(reason)).expect("black");
        let fade_in = first(FadeEvent::FadeInStarted(reason)).expect("fade in");
        let settling = first(FadeEvent::Settling(reason)).expect("settling");
        let finished = first(FadeEvent::Finished(reason)).expect("finished");

        assert!(hitstun < black && black < fade_in && fade_in < settling && settling < finished);
        assert_eq!(events.iter().filter(|e| matches!(e, FadeEvent::FirstFrame(_))).count(), 1);
        assert_eq!(fade.alpha, 0);
        assert_eq!(fade.phase, FadePhase::Clear);
    }

    #[test]
    fn test_start_while_fading_is_ignored() {
        let mut fade = ScreenFade::new();
        assert!(fade.start(FadeReason::LevelTransition));
        fade.tick();
        assert!(!fade.start(FadeReason::Death));
        assert_eq!(fade.phase, FadePhase::Out(FadeReason::LevelTransition));
    }

    #[test]
    fn test_black_and_fade_in_share_a_tick() {
        let mut fade = ScreenFade::new();
        fade.start(FadeReason::Death);
        let mut ticks = 0;
        loop {
            ticks += 1;
            let events = fade.tick();
            if events.contains(&FadeEvent::Black(FadeReason::Death)) {
                assert!(events.contains(&FadeEvent::FadeInStarted(FadeReason::Death)));
                break;
            }
        }
        // 43 ticks to reach 255, one more to notice
        assert_eq!(ticks, 44);
        assert_eq!(fade.alpha, 249);
    }
}
