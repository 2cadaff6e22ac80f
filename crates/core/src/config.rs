//! Loading and validating [`GameConfig`].

use crate::error::{ConfigurationError, Result};
use crate::types::GameConfig;

/// Largest board edge accepted (locked blocks store coordinates in a byte).
pub const MAX_BOARD_EDGE: u16 = 255;

/// Parse a JSON config document; missing sections and fields keep their defaults.
pub fn parse_config(json: &str) -> Result<GameConfig> {
    let config: GameConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Reject values the simulation cannot run with.
pub fn validate_config(config: &GameConfig) -> Result<()> {
    let invalid = |msg: String| Err(ConfigurationError::InvalidConfig(msg));
    let board = &config.board;
    if board.cols == 0 || board.rows == 0 {
        return invalid(format!(
            "board must be at least 1x1, got {}x{}",
            board.cols, board.rows
        ));
    }
    if board.cols > MAX_BOARD_EDGE || board.rows > MAX_BOARD_EDGE {
        return invalid(format!(
            "board must be at most {MAX_BOARD_EDGE}x{MAX_BOARD_EDGE}, got {}x{}",
            board.cols, board.rows
        ));
    }

    let timing = &config.timing;
    if timing.base_drop_ms == 0 {
        return invalid("timing.base_drop_ms must be positive".to_string());
    }
    if timing.min_drop_ms == 0 || timing.min_drop_ms > timing.base_drop_ms {
        return invalid(format!(
            "timing.min_drop_ms must be in 1..={}, got {}",
            timing.base_drop_ms, timing.min_drop_ms
        ));
    }
    if timing.min_soft_drop_ms == 0 {
        return invalid("timing.min_soft_drop_ms must be positive".to_string());
    }
    if timing.lines_per_level == 0 {
        return invalid("timing.lines_per_level must be positive".to_string());
    }
    if !(timing.speed_multiplier > 0.0 && timing.speed_multiplier <= 1.0) {
        return invalid(format!(
            "timing.speed_multiplier must be in (0, 1], got {}",
            timing.speed_multiplier
        ));
    }
    if !(timing.soft_drop_factor > 0.0 && timing.soft_drop_factor <= 1.0) {
        return invalid(format!(
            "timing.soft_drop_factor must be in (0, 1], got {}",
            timing.soft_drop_factor
        ));
    }
    if timing.max_fall_steps_per_frame == 0 || timing.max_accumulated_steps == 0 {
        return invalid("timing step limits must be positive".to_string());
    }

    let prob = config.assist.allow_harder_than_2_prob;
    if !(0.0..=1.0).contains(&prob) {
        return invalid(format!(
            "assist.allow_harder_than_2_prob must be in [0, 1], got {prob}"
        ));
    }

    Ok(())
}
