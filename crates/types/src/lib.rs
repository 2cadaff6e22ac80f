//! Core types module - shared data structures and constants
//!
//! This module defines the plain data passed between the engine, the input
//! adapters and the terminal view. Nothing here performs I/O or owns game
//! state, so every type is usable from any layer.
//!
//! # Default Tuning
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 850 | Gravity interval at level 1 |
//! | `MIN_DROP_MS` | 110 | Gravity never gets faster than this |
//! | `LINES_PER_LEVEL` | 8 | Cleared lines per level step |
//! | `SPEED_MULTIPLIER` | 0.88 | Interval factor applied per level |
//! | `SOFT_DROP_FACTOR` | 0.12 | Interval factor while soft drop is held |
//! | `MIN_SOFT_DROP_MS` | 16 | Floor for the soft-drop interval |
//! | `LOCK_DELAY_KEYBOARD_MS` | 250 | Grace before a grounded piece locks |
//! | `LOCK_DELAY_TOUCH_MS` | 450 | Grace after recent touch input |
//!
//! # Examples
//!
//! ```
//! use contortris_types::{GameConfig, Intent, InputEvent, InputKind};
//!
//! let config = GameConfig::default();
//! assert_eq!(config.board.cols, 10);
//! assert_eq!(config.board.rows, 20);
//!
//! let event = InputEvent::touch(Intent::Rotate);
//! assert_eq!(event.source, InputKind::Touch);
//! ```

pub mod config;

pub use config::{
    AssistConfig, BoardConfig, GameConfig, LockConfig, RepeatConfig, ScoringConfig, TimingConfig,
};

/// Board width in cells (10 columns)
pub const BOARD_COLS: u16 = 10;

/// Board height in cells (20 rows)
pub const BOARD_ROWS: u16 = 20;

/// Gravity interval at level 1.
pub const BASE_DROP_MS: u32 = 850;

/// Fastest gravity interval reachable through levelling.
pub const MIN_DROP_MS: u32 = 110;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 8;

/// Per-level multiplier applied to the base interval.
pub const SPEED_MULTIPLIER: f64 = 0.88;

/// Gravity interval factor while soft drop is held (~8x faster).
pub const SOFT_DROP_FACTOR: f64 = 0.12;

/// Floor for the soft-drop interval.
pub const MIN_SOFT_DROP_MS: u32 = 16;

/// At most this many gravity rows per frame.
pub const MAX_FALL_STEPS_PER_FRAME: u32 = 1;

/// Gravity debt is capped at this many intervals.
pub const MAX_ACCUMULATED_STEPS: u32 = 2;

/// Frame delta cap applied by the runner before ticking.
pub const MAX_FRAME_DT_MS: u32 = 50;

/// Lock delay when the last input came from the keyboard.
pub const LOCK_DELAY_KEYBOARD_MS: u32 = 250;

/// Lock delay when the last input was a recent touch.
pub const LOCK_DELAY_TOUCH_MS: u32 = 450;

/// How long a touch keeps the longer lock delay in effect.
pub const TOUCH_RECENCY_MS: u32 = 1500;

/// Hold time before a held move starts repeating.
pub const REPEAT_DELAY_MS: u32 = 170;

/// Interval between repeated moves while held.
pub const REPEAT_INTERVAL_MS: u32 = 60;

/// Keyboard holds are dropped after this long without a fresh press.
pub const KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Points for clearing 1, 2, 3 and 4 lines at once (multiplied by level).
pub const LINE_CLEAR_POINTS: [u32; 4] = [100, 250, 450, 700];

/// Points per gravity row gained while soft dropping.
pub const SOFT_DROP_PER_CELL: u32 = 1;

/// A stack reaching into this many top rows limits difficulty to 2.
pub const TOP_ROWS_FOR_DIFF2_ONLY: u32 = 6;

/// A stack reaching into this many top rows limits difficulty to 1.
pub const TOP_ROWS_FOR_DIFF1_ONLY: u32 = 3;

/// Chance to waive the difficulty-2 cap for a single draw.
pub const ALLOW_HARDER_THAN_2_PROB: f64 = 0.15;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Axis-aligned rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// Whether `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x as u32) < self.x as u32 + self.w as u32
            && (y as u32) < self.y as u32 + self.h as u32
    }
}

/// Player intents understood by the engine.
///
/// Both the keyboard map and the tap zones produce these; repeat drivers
/// re-issue the same intents instead of moving pieces on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Shift the active piece one column left
    MoveLeft,
    /// Shift the active piece one column right
    MoveRight,
    /// Rotate to the next allowed orientation (with wall kicks)
    Rotate,
    /// Start accelerated gravity
    SoftDropOn,
    /// Return to normal gravity
    SoftDropOff,
    /// Start (or restart after game over)
    Start,
    Pause,
    Resume,
    TogglePause,
    /// Throw away the current game and prepare a fresh one
    Reset,
}

/// Which kind of device produced an input.
///
/// Touch input earns a longer lock delay while it is recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputKind {
    #[default]
    Keyboard,
    Touch,
}

/// An intent tagged with the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub intent: Intent,
    pub source: InputKind,
}

impl InputEvent {
    pub const fn new(intent: Intent, source: InputKind) -> Self {
        Self { intent, source }
    }

    pub const fn keyboard(intent: Intent) -> Self {
        Self::new(intent, InputKind::Keyboard)
    }

    pub const fn touch(intent: Intent) -> Self {
        Self::new(intent, InputKind::Touch)
    }
}

/// Core-side event emitted after a piece locks.
///
/// Consumed by the runner for logging and by views that flash on clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Points awarded for the clear (already multiplied by level)
    pub points: u32,
    pub level_up: bool,
    pub game_over: bool,
}
