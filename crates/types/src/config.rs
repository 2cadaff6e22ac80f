//! Game configuration.
//!
//! Every section deserializes with `#[serde(default)]`, so a config file only
//! needs the keys it wants to override.

use serde::{Deserialize, Serialize};

use crate::*;

/// Complete tuning for one game.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub lock: LockConfig,
    pub repeat: RepeatConfig,
    pub scoring: ScoringConfig,
    pub assist: AssistConfig,
}

impl GameConfig {
    pub fn with_board(mut self, cols: u16, rows: u16) -> Self {
        self.board = BoardConfig { cols, rows };
        self
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set both lock delays. `0, 0` makes pieces lock on touch-down.
    pub fn with_lock_delays(mut self, keyboard_ms: u32, touch_ms: u32) -> Self {
        self.lock.keyboard_ms = keyboard_ms;
        self.lock.touch_ms = touch_ms;
        self
    }

    pub fn with_repeat(mut self, repeat: RepeatConfig) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_assist(mut self, assist: AssistConfig) -> Self {
        self.assist = assist;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub cols: u16,
    pub rows: u16,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            cols: BOARD_COLS,
            rows: BOARD_ROWS,
        }
    }
}

/// Gravity timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub base_drop_ms: u32,
    pub min_drop_ms: u32,
    pub lines_per_level: u32,
    pub speed_multiplier: f64,
    pub soft_drop_factor: f64,
    pub min_soft_drop_ms: u32,
    pub max_fall_steps_per_frame: u32,
    pub max_accumulated_steps: u32,
    pub max_frame_dt_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_drop_ms: BASE_DROP_MS,
            min_drop_ms: MIN_DROP_MS,
            lines_per_level: LINES_PER_LEVEL,
            speed_multiplier: SPEED_MULTIPLIER,
            soft_drop_factor: SOFT_DROP_FACTOR,
            min_soft_drop_ms: MIN_SOFT_DROP_MS,
            max_fall_steps_per_frame: MAX_FALL_STEPS_PER_FRAME,
            max_accumulated_steps: MAX_ACCUMULATED_STEPS,
            max_frame_dt_ms: MAX_FRAME_DT_MS,
        }
    }
}

/// Lock-delay thresholds per input kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub keyboard_ms: u32,
    pub touch_ms: u32,
    /// A touch older than this no longer counts as "recent".
    pub touch_recency_ms: u32,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            keyboard_ms: LOCK_DELAY_KEYBOARD_MS,
            touch_ms: LOCK_DELAY_TOUCH_MS,
            touch_recency_ms: TOUCH_RECENCY_MS,
        }
    }
}

/// Press-and-hold repeat timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatConfig {
    pub delay_ms: u32,
    pub interval_ms: u32,
    pub key_release_timeout_ms: u32,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            delay_ms: REPEAT_DELAY_MS,
            interval_ms: REPEAT_INTERVAL_MS,
            key_release_timeout_ms: KEY_RELEASE_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base points for 1..=4 simultaneous lines. Larger clears score `count * 100`.
    pub line_clear: [u32; 4],
    pub soft_drop_per_cell: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            line_clear: LINE_CLEAR_POINTS,
            soft_drop_per_cell: SOFT_DROP_PER_CELL,
        }
    }
}

/// Danger-zone thresholds used by the piece selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    pub top_rows_for_diff2_only: u32,
    pub top_rows_for_diff1_only: u32,
    pub allow_harder_than_2_prob: f64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            top_rows_for_diff2_only: TOP_ROWS_FOR_DIFF2_ONLY,
            top_rows_for_diff1_only: TOP_ROWS_FOR_DIFF1_ONLY,
            allow_harder_than_2_prob: ALLOW_HARDER_THAN_2_PROB,
        }
    }
}
