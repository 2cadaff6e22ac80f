//! Key mapping from terminal events to game intents.
//!
//! Held keys (movement and soft drop) are also understood by
//! [`InputHandler`](crate::InputHandler), which owns their repeat timing.

use crate::types::Intent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game intents.
///
/// `n` maps to [`Intent::Reset`]; the runner starts the fresh game right away.
pub fn handle_key_event(key: KeyEvent) -> Option<Intent> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Intent::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Intent::MoveRight)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Intent::SoftDropOn)
        }

        // Rotation
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(Intent::Rotate),

        // Game flow
        KeyCode::Char(' ') => Some(Intent::TogglePause),
        KeyCode::Enter => Some(Intent::Start),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Intent::Reset),

        _ => None,
    }
}

/// Whether the key is held for movement or soft drop (repeat handled elsewhere).
pub fn is_held_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Left
            | KeyCode::Right
            | KeyCode::Down
            | KeyCode::Char('h' | 'H' | 'a' | 'A' | 'l' | 'L' | 'd' | 'D' | 'j' | 'J' | 's' | 'S')
    )
}

/// Check if key toggles the debug panel.
pub fn is_debug_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::F(3) | KeyCode::Char('g') | KeyCode::Char('G'))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(Intent::MoveLeft)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Right)),
            Some(Intent::MoveRight)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Down)),
            Some(Intent::SoftDropOn)
        );

        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('H'))),
            Some(Intent::MoveLeft)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('d'))),
            Some(Intent::MoveRight)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('J'))),
            Some(Intent::SoftDropOn)
        );
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Up)),
            Some(Intent::Rotate)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('W'))),
            Some(Intent::Rotate)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_flow_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(Intent::TogglePause)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Enter)),
            Some(Intent::Start)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('n'))),
            Some(Intent::Reset)
        );
    }

    #[test]
    fn test_held_keys() {
        assert!(is_held_key(KeyCode::Left));
        assert!(is_held_key(KeyCode::Char('s')));
        assert!(!is_held_key(KeyCode::Up));
        assert!(!is_held_key(KeyCode::Char(' ')));
    }

    #[test]
    fn test_debug_and_quit_keys() {
        assert!(is_debug_toggle(KeyEvent::from(KeyCode::F(3))));
        assert!(is_debug_toggle(KeyEvent::from(KeyCode::Char('g'))));
        assert!(!is_debug_toggle(KeyEvent::from(KeyCode::Char('d'))));

        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
