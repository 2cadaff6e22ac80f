//! Tap zones for pointer input on the board.
//!
//! The board splits into thirds: the outer thirds move, the middle third
//! rotates in its upper half and soft-drops in its lower half.

use crate::types::Rect;

/// Two presses closer than this count as a double tap.
pub const DOUBLE_TAP_MS: u32 = 320;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapZone {
    Left,
    Right,
    Rotate,
    SoftDrop,
}

/// Zone under terminal position `(col, row)`, or `None` outside the board.
pub fn hit_test(board: Rect, col: u16, row: u16) -> Option<TapZone> {
    if !board.contains(col, row) {
        return None;
    }
    let rel_x = (col - board.x) as u32;
    let rel_y = (row - board.y) as u32;
    let (w, h) = (board.w as u32, board.h as u32);

    if rel_x * 3 < w {
        Some(TapZone::Left)
    } else if rel_x * 3 >= w * 2 {
        Some(TapZone::Right)
    } else if rel_y * 2 < h {
        Some(TapZone::Rotate)
    } else {
        Some(TapZone::SoftDrop)
    }
}

/// Detects two presses within a short window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleTap {
    window_ms: u32,
    last_press_ms: Option<u64>,
}

impl DoubleTap {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_press_ms: None,
        }
    }

    /// Register a press at `now_ms`; true when it completes a double tap.
    ///
    /// A completed double tap is consumed, so a third quick press starts over.
    pub fn press(&mut self, now_ms: u64) -> bool {
        match self.last_press_ms {
            Some(prev) if now_ms.saturating_sub(prev) <= self.window_ms as u64 => {
                self.last_press_ms = None;
                true
            }
            _ => {
                self.last_press_ms = Some(now_ms);
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_press_ms = None;
    }
}

impl Default for DoubleTap {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: Rect = Rect::new(10, 2, 30, 20);

    #[test]
    fn test_outside_board_is_none() {
        assert_eq!(hit_test(BOARD, 9, 5), None);
        assert_eq!(hit_test(BOARD, 40, 5), None);
        assert_eq!(hit_test(BOARD, 15, 1), None);
        assert_eq!(hit_test(BOARD, 15, 22), None);
    }

    #[test]
    fn test_thirds_and_halves() {
        assert_eq!(hit_test(BOARD, 10, 2), Some(TapZone::Left));
        assert_eq!(hit_test(BOARD, 19, 21), Some(TapZone::Left));
        assert_eq!(hit_test(BOARD, 20, 2), Some(TapZone::Rotate));
        assert_eq!(hit_test(BOARD, 29, 11), Some(TapZone::Rotate));
        assert_eq!(hit_test(BOARD, 29, 12), Some(TapZone::SoftDrop));
        assert_eq!(hit_test(BOARD, 30, 2), Some(TapZone::Right));
        assert_eq!(hit_test(BOARD, 39, 21), Some(TapZone::Right));
    }

    #[test]
    fn test_double_tap_window() {
        let mut taps = DoubleTap::default();
        assert!(!taps.press(1000));
        assert!(taps.press(1320));
        // Consumed: the next press starts a new pair.
        assert!(!taps.press(1400));
        assert!(!taps.press(1800));
    }
}
