//! Timed on-screen messages
//!
//! Messages fade in, stay for a while and fade out. The app draws them with
//! egui using `opacity`; the core only keeps the timing.

pub const DEFAULT_FADE_IN: i32 = 30;
pub const DEFAULT_ON_SCREEN: i32 = 300;
pub const DEFAULT_FADE_OUT: i32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct HudMessage {
    pub text: String,
    /// Ticks since the message appeared
    pub tick: i32,
    pub fade_in: i32,
    pub on_screen: i32,
    pub fade_out: i32,
    pub opacity: i32,
    /// Fixed messages never fade and never expire
    pub fixed: bool,
}

impl HudMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tick: 0,
            fade_in: DEFAULT_FADE_IN,
            on_screen: DEFAULT_ON_SCREEN,
            fade_out: DEFAULT_FADE_OUT,
            opacity: 0,
            fixed: false,
        }
    }

    /// A message that stays fully visible until removed
    pub fn fixed(text: impl Into<String>) -> Self {
        Self {
            opacity: 255,
            fixed: true,
            ..Self::new(text)
        }
    }

    pub fn with_on_screen(mut self, ticks: i32) -> Self {
        self.on_screen = ticks;
        self
    }

    /// Advance one tick; false once the message should be dropped
    pub fn update(&mut self) -> bool {
        self.tick += 1;
        if self.fixed {
            return true;
        }

        if self.tick < self.fade_in {
            self.opacity = (self.opacity + 255 / self.fade_in.max(1)).min(254);
        }
        if self.tick > self.on_screen {
            self.opacity = (self.opacity - 255 / self.fade_out.max(1)).max(0);
        }

        let expired = self.tick > self.on_screen + self.fade_out;
        !(expired || self.opacity == 0)
    }

    /// Opacity as a 0..=1 factor
    pub fn alpha(&self) -> f32 {
        self.opacity.clamp(0, 255) as f32 / 255.0
    }
}

/// Active messages, newest last
#[derive(Debug, Clone, Default)]
pub struct Hud {
    messages: Vec<HudMessage>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: HudMessage) {
        log::debug!("HUD: {}", message.text);
        self.messages.push(message);
    }

    /// Show a plain fading message
    pub fn show(&mut self, text: impl Into<String>) {
        self.push(HudMessage::new(text));
    }

    /// Show a message unless the same text is already on screen
    pub fn show_once(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !self.is_showing(&text) {
            self.show(text);
        }
    }

    pub fn is_showing(&self, text: &str) -> bool {
        self.messages.iter().any(|message| message.text == text)
    }

    pub fn update(&mut self) {
        self.messages.retain_mut(HudMessage::update);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[HudMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_is_capped() {
        let mut message = HudMessage::new("hello");
        for _ in 0..29 {
            assert!(message.update());
        }
        // 29 ticks of 255 / 30 = 8
        assert_eq!(message.opacity, 232);

        for _ in 0..100 {
            message.update();
        }
        assert!(message.opacity <= 254);
    }

    #[test]
    fn test_message_expires_after_fade_out() {
        let mut message = HudMessage::new("bye");
        let mut lifetime = 0;
        while message.update() {
            lifetime += 1;
            assert!(lifetime < 1000);
        }
        // Opacity 232 loses 4 per tick after tick 300, reaching 0 at tick 358
        assert_eq!(message.tick, 358);
        assert_eq!(message.opacity, 0);
    }

    #[test]
    fn test_fixed_message_stays() {
        let mut message = HudMessage::fixed("paused");
        for _ in 0..1000 {
            assert!(message.update());
        }
        assert_eq!(message.opacity, 255);
    }

    #[test]
    fn test_hud_drops_expired_messages() {
        let mut hud = Hud::new();
        hud.show("short");
        hud.push(HudMessage::fixed("stays"));
        for _ in 0..400 {
            hud.update();
        }
        assert_eq!(hud.messages().len(), 1);
        assert_eq!(hud.messages()[0].text, "stays");
    }

    #[test]
    fn test_show_once_skips_duplicates() {
        let mut hud = Hud::new();
        hud.show_once("Requires: Mantis Claw");
        hud.show_once("Requires: Mantis Claw");
        assert_eq!(hud.messages().len(), 1);

        // Shown again once the first copy has expired
        for _ in 0..400 {
            hud.update();
        }
        assert!(!hud.is_showing("Requires: Mantis Claw"));
        hud.show_once("Requires: Mantis Claw");
        assert_eq!(hud.messages().len(), 1);
    }
}
