//! Hold-repeat input handler for terminal environments.
//!
//! Turns key presses, key releases and pointer presses into [`InputEvent`]s.
//! Held movement repeats after a delay; held soft drop stays on until release.
//! Terminals that never report key releases are covered by a timeout.
//!
//! Time only advances through [`InputHandler::update`], so behavior is fully
//! determined by the sequence of calls.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::types::{InputEvent, InputKind, Intent, RepeatConfig};
use crate::zones::{DoubleTap, TapZone};

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

impl HorizontalDirection {
    fn intent(self) -> Option<Intent> {
        match self {
            HorizontalDirection::Left => Some(Intent::MoveLeft),
            HorizontalDirection::Right => Some(Intent::MoveRight),
            HorizontalDirection::None => None,
        }
    }
}

/// Tracks held keys and pointer zones for repeat handling.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    horizontal_source: InputKind,
    down_held: bool,
    down_source: InputKind,
    /// Zone under a pointer that is still pressed
    pointer_zone: Option<TapZone>,
    clock_ms: u64,
    last_key_ms: u64,
    horizontal_timer: u32,
    horizontal_repeat_accumulator: u32,
    delay_ms: u32,
    interval_ms: u32,
    key_release_timeout_ms: u32,
    double_tap: DoubleTap,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::from_config(&RepeatConfig::default())
    }

    pub fn from_config(config: &RepeatConfig) -> Self {
        Self::with_config(config.delay_ms, config.interval_ms)
            .with_key_release_timeout_ms(config.key_release_timeout_ms)
    }

    pub fn with_config(delay_ms: u32, interval_ms: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            horizontal_source: InputKind::Keyboard,
            down_held: false,
            down_source: InputKind::Keyboard,
            pointer_zone: None,
            clock_ms: 0,
            last_key_ms: 0,
            horizontal_timer: 0,
            horizontal_repeat_accumulator: 0,
            delay_ms,
            interval_ms: interval_ms.max(1),
            key_release_timeout_ms: RepeatConfig::default().key_release_timeout_ms,
            double_tap: DoubleTap::default(),
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn horizontal(&self) -> HorizontalDirection {
        self.horizontal
    }

    pub fn soft_drop_held(&self) -> bool {
        self.down_held
    }

    /// `SoftDropOn` for a soft drop that is still held, to re-apply after the
    /// game starts or resumes.
    pub fn held_soft_drop(&self) -> Option<InputEvent> {
        self.down_held
            .then(|| InputEvent::new(Intent::SoftDropOn, self.down_source))
    }

    fn hold_horizontal(&mut self, dir: HorizontalDirection, source: InputKind) -> Option<InputEvent> {
        if self.horizontal == dir && self.horizontal_source == source {
            return None;
        }
        self.horizontal = dir;
        self.horizontal_source = source;
        self.horizontal_timer = 0;
        self.horizontal_repeat_accumulator = 0;
        dir.intent().map(|intent| InputEvent::new(intent, source))
    }

    fn release_horizontal(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.horizontal_timer = 0;
        self.horizontal_repeat_accumulator = 0;
    }

    /// Repeated presses re-send `SoftDropOn` so a hold that began while the
    /// game ignored it still takes effect once play starts.
    fn hold_down(&mut self, source: InputKind) -> Option<InputEvent> {
        if !self.down_held {
            self.down_held = true;
            self.down_source = source;
        }
        Some(InputEvent::new(Intent::SoftDropOn, self.down_source))
    }

    fn release_down(&mut self) -> Option<InputEvent> {
        if !self.down_held {
            return None;
        }
        self.down_held = false;
        Some(InputEvent::new(Intent::SoftDropOff, self.down_source))
    }

    /// A key went down (or the terminal repeated it).
    ///
    /// Returns the immediate event for the first press of a held key.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<InputEvent> {
        let kb = InputKind::Keyboard;
        match code {
            KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => {
                self.last_key_ms = self.clock_ms;
                self.hold_horizontal(HorizontalDirection::Left, kb)
            }
            KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => {
                self.last_key_ms = self.clock_ms;
                self.hold_horizontal(HorizontalDirection::Right, kb)
            }
            KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J') => {
                self.last_key_ms = self.clock_ms;
                self.hold_down(kb)
            }
            _ => None,
        }
    }

    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<InputEvent> {
        match code {
            KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => {
                if self.horizontal == HorizontalDirection::Left {
                    self.release_horizontal();
                }
                None
            }
            KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => {
                if self.horizontal == HorizontalDirection::Right {
                    self.release_horizontal();
                }
                None
            }
            KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J') => self.release_down(),
            _ => None,
        }
    }

    /// Pointer pressed at `zone` (`None` outside the board).
    ///
    /// A double tap anywhere also starts or resumes the game.
    pub fn handle_pointer_press(&mut self, zone: Option<TapZone>) -> ArrayVec<InputEvent, 2> {
        let mut events = ArrayVec::new();
        let touch = InputKind::Touch;

        if let Some(zone) = zone {
            self.pointer_zone = Some(zone);
            let event = match zone {
                TapZone::Left => self.hold_horizontal(HorizontalDirection::Left, touch),
                TapZone::Right => self.hold_horizontal(HorizontalDirection::Right, touch),
                TapZone::SoftDrop => self.hold_down(touch),
                TapZone::Rotate => Some(InputEvent::touch(Intent::Rotate)),
            };
            if let Some(event) = event {
                events.push(event);
            }
        }
        if self.double_tap.press(self.clock_ms) {
            events.push(InputEvent::touch(Intent::Start));
        }
        events
    }

    /// Pointer released: ends whatever the press was holding.
    pub fn handle_pointer_release(&mut self) -> Option<InputEvent> {
        match self.pointer_zone.take()? {
            TapZone::Left | TapZone::Right if self.horizontal_source == InputKind::Touch => {
                self.release_horizontal();
                None
            }
            TapZone::SoftDrop if self.down_source == InputKind::Touch => self.release_down(),
            _ => None,
        }
    }

    /// Advance time and collect repeats (and auto-releases).
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<InputEvent, 32> {
        let mut events = ArrayVec::<InputEvent, 32>::new();
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms as u64);

        // Auto-release keyboard holds when the terminal does not emit release events.
        let since_last_key = self.clock_ms.saturating_sub(self.last_key_ms);
        if since_last_key > self.key_release_timeout_ms as u64 {
            if self.horizontal != HorizontalDirection::None
                && self.horizontal_source == InputKind::Keyboard
            {
                self.release_horizontal();
            }
            if self.down_source == InputKind::Keyboard {
                if let Some(event) = self.release_down() {
                    let _ = events.try_push(event);
                }
            }
        }

        match self.horizontal.intent() {
            Some(intent) => {
                let event = InputEvent::new(intent, self.horizontal_source);
                let prev = self.horizontal_timer;
                self.horizontal_timer = prev.saturating_add(elapsed_ms);

                if prev < self.delay_ms && self.horizontal_timer >= self.delay_ms {
                    // First repeat fires when the delay runs out.
                    let _ = events.try_push(event);
                    self.horizontal_repeat_accumulator = self.horizontal_timer - self.delay_ms;
                } else if prev >= self.delay_ms {
                    self.horizontal_repeat_accumulator += elapsed_ms;
                }

                while self.horizontal_repeat_accumulator >= self.interval_ms {
                    let _ = events.try_push(event);
                    self.horizontal_repeat_accumulator -= self.interval_ms;
                }
            }
            None => {
                self.horizontal_timer = 0;
                self.horizontal_repeat_accumulator = 0;
            }
        }

        events
    }

    /// Drop every held key and pointer (e.g. on focus loss or pause).
    pub fn reset(&mut self) {
        self.release_horizontal();
        self.down_held = false;
        self.pointer_zone = None;
        self.last_key_ms = self.clock_ms;
        self.double_tap.reset();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intents(events: &[InputEvent]) -> Vec<Intent> {
        events.iter().map(|e| e.intent).collect()
    }

    #[test]
    fn test_horizontal_repeats_after_delay_then_every_interval() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);

        assert_eq!(
            ih.handle_key_press(KeyCode::Left),
            Some(InputEvent::keyboard(Intent::MoveLeft))
        );

        // Before the delay expires: no repeats.
        assert!(ih.update(99).is_empty());

        // Delay reached: first repeat.
        assert_eq!(intents(&ih.update(1)), vec![Intent::MoveLeft]);

        // Nothing until a full interval passes.
        assert!(ih.update(24).is_empty());
        assert_eq!(intents(&ih.update(1)), vec![Intent::MoveLeft]);

        // A long frame catches up on every interval.
        assert_eq!(
            intents(&ih.update(50)),
            vec![Intent::MoveLeft, Intent::MoveLeft]
        );
    }

    #[test]
    fn test_repeated_press_does_not_restart_hold() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
        assert!(ih.handle_key_press(KeyCode::Right).is_some());
        ih.update(60);
        assert_eq!(ih.handle_key_press(KeyCode::Char('d')), None);
        assert_eq!(intents(&ih.update(40)), vec![Intent::MoveRight]);
    }

    #[test]
    fn test_auto_release_after_timeout_without_release_events() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(50);

        assert!(ih.handle_key_press(KeyCode::Left).is_some());
        assert_eq!(ih.horizontal(), HorizontalDirection::Left);

        assert!(ih.update(51).is_empty());
        assert_eq!(ih.horizontal(), HorizontalDirection::None);
    }

    #[test]
    fn test_non_movement_key_does_not_extend_auto_release_timeout() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(50);

        assert!(ih.handle_key_press(KeyCode::Left).is_some());
        ih.update(40);
        assert_eq!(ih.handle_key_press(KeyCode::Up), None);

        ih.update(11);
        assert_eq!(ih.horizontal(), HorizontalDirection::None);
    }

    #[test]
    fn test_default_key_release_timeout_is_non_zero() {
        let ih = InputHandler::new();
        assert!(ih.key_release_timeout_ms() > 0);
    }

    #[test]
    fn test_soft_drop_is_held_not_repeated() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(10_000);

        assert_eq!(
            ih.handle_key_press(KeyCode::Down),
            Some(InputEvent::keyboard(Intent::SoftDropOn))
        );
        assert!(ih.update(500).is_empty());
        assert_eq!(
            ih.handle_key_press(KeyCode::Char('s')),
            Some(InputEvent::keyboard(Intent::SoftDropOn))
        );
        assert!(ih.update(500).is_empty());
        assert_eq!(
            ih.handle_key_release(KeyCode::Down),
            Some(InputEvent::keyboard(Intent::SoftDropOff))
        );
        assert_eq!(ih.handle_key_release(KeyCode::Down), None);
    }

    #[test]
    fn test_held_soft_drop_reports_source() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.held_soft_drop(), None);
        ih.handle_pointer_press(Some(TapZone::SoftDrop));
        assert_eq!(
            ih.held_soft_drop(),
            Some(InputEvent::touch(Intent::SoftDropOn))
        );
        // A key press during a pointer hold keeps the pointer as the owner.
        assert_eq!(
            ih.handle_key_press(KeyCode::Down),
            Some(InputEvent::touch(Intent::SoftDropOn))
        );
        ih.handle_pointer_release();
        assert_eq!(ih.held_soft_drop(), None);
    }

    #[test]
    fn test_soft_drop_auto_release_emits_off() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(150);
        assert!(ih.handle_key_press(KeyCode::Down).is_some());
        assert!(ih.update(150).is_empty());
        assert_eq!(
            ih.update(1).as_slice(),
            &[InputEvent::keyboard(Intent::SoftDropOff)]
        );
        assert!(!ih.soft_drop_held());
    }

    #[test]
    fn test_pointer_hold_repeats_until_release() {
        let mut ih = InputHandler::with_config(170, 60).with_key_release_timeout_ms(150);

        let events = ih.handle_pointer_press(Some(TapZone::Right));
        assert_eq!(events.as_slice(), &[InputEvent::touch(Intent::MoveRight)]);

        // Touch holds ignore the keyboard auto-release.
        assert!(ih.update(169).is_empty());
        assert_eq!(
            ih.update(1).as_slice(),
            &[InputEvent::touch(Intent::MoveRight)]
        );
        assert_eq!(ih.update(60).len(), 1);

        assert_eq!(ih.handle_pointer_release(), None);
        assert!(ih.update(500).is_empty());
    }

    #[test]
    fn test_pointer_soft_drop_zone() {
        let mut ih = InputHandler::new();
        let events = ih.handle_pointer_press(Some(TapZone::SoftDrop));
        assert_eq!(events.as_slice(), &[InputEvent::touch(Intent::SoftDropOn)]);
        assert!(ih.update(1000).is_empty());
        assert_eq!(
            ih.handle_pointer_release(),
            Some(InputEvent::touch(Intent::SoftDropOff))
        );
    }

    #[test]
    fn test_pointer_rotate_fires_once() {
        let mut ih = InputHandler::new();
        let events = ih.handle_pointer_press(Some(TapZone::Rotate));
        assert_eq!(events.as_slice(), &[InputEvent::touch(Intent::Rotate)]);
        assert!(ih.update(1000).is_empty());
        assert_eq!(ih.handle_pointer_release(), None);
    }

    #[test]
    fn test_double_tap_starts() {
        let mut ih = InputHandler::new();
        assert!(ih.handle_pointer_press(None).is_empty());
        ih.update(200);
        assert_eq!(
            ih.handle_pointer_press(None).as_slice(),
            &[InputEvent::touch(Intent::Start)]
        );
    }

    #[test]
    fn test_reset_clears_held_state_and_stops_repeats() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);

        assert!(ih.handle_key_press(KeyCode::Left).is_some());
        assert!(!ih.update(200).is_empty(), "expected repeats before reset");

        ih.reset();
        assert!(ih.update(200).is_empty(), "reset should stop repeats");
    }
}
