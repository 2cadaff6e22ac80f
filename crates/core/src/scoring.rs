//! Scoring module - line-clear points, levels and gravity speed
//!
//! Points for a clear come from the configured table for 1-4 lines and
//! `count * 100` for anything larger, always multiplied by the current level.
//! Levels start at 1 and advance every `lines_per_level` cleared lines; each
//! level shortens the gravity interval geometrically down to a floor.

use crate::types::{ScoringConfig, TimingConfig};

/// Base points for clearing `count` lines at once (before the level multiplier).
pub fn line_clear_points(count: u32, scoring: &ScoringConfig) -> u32 {
    match count {
        0 => 0,
        1..=4 => scoring.line_clear[count as usize - 1],
        _ => count.saturating_mul(100),
    }
}

/// Points actually awarded for a clear at `level`.
pub fn calculate_score(count: u32, level: u32, scoring: &ScoringConfig) -> u32 {
    line_clear_points(count, scoring).saturating_mul(level)
}

/// Level reached after `lines` total cleared lines (1-based).
pub fn level_for_lines(lines: u32, timing: &TimingConfig) -> u32 {
    1 + lines / timing.lines_per_level.max(1)
}

/// Gravity interval for `level`.
pub fn drop_interval_ms(level: u32, timing: &TimingConfig) -> u32 {
    let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    let scaled = (timing.base_drop_ms as f64 * timing.speed_multiplier.powi(exponent)).floor();
    (scaled as u32).max(timing.min_drop_ms)
}

/// Gravity interval while soft drop is held.
pub fn soft_drop_interval_ms(drop_ms: u32, timing: &TimingConfig) -> u32 {
    let scaled = (drop_ms as f64 * timing.soft_drop_factor).floor() as u32;
    scaled.max(timing.min_soft_drop_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_table() {
        let scoring = ScoringConfig::default();
        assert_eq!(line_clear_points(0, &scoring), 0);
        assert_eq!(line_clear_points(1, &scoring), 100);
        assert_eq!(line_clear_points(2, &scoring), 250);
        assert_eq!(line_clear_points(3, &scoring), 450);
        assert_eq!(line_clear_points(4, &scoring), 700);
        assert_eq!(line_clear_points(5, &scoring), 500);
        assert_eq!(line_clear_points(7, &scoring), 700);
    }

    #[test]
    fn test_score_scales_with_level() {
        let scoring = ScoringConfig::default();
        assert_eq!(calculate_score(1, 1, &scoring), 100);
        assert_eq!(calculate_score(2, 3, &scoring), 750);
        assert_eq!(calculate_score(0, 9, &scoring), 0);
    }

    #[test]
    fn test_levels_advance_every_eight_lines() {
        let timing = TimingConfig::default();
        assert_eq!(level_for_lines(0, &timing), 1);
        assert_eq!(level_for_lines(7, &timing), 1);
        assert_eq!(level_for_lines(8, &timing), 2);
        assert_eq!(level_for_lines(17, &timing), 3);
    }

    #[test]
    fn test_drop_interval_curve() {
        let timing = TimingConfig::default();
        assert_eq!(drop_interval_ms(1, &timing), 850);
        // floor(850 * 0.88)
        assert_eq!(drop_interval_ms(2, &timing), 748);
        // floor(850 * 0.88^2) = floor(658.24)
        assert_eq!(drop_interval_ms(3, &timing), 658);
        assert_eq!(drop_interval_ms(40, &timing), 110);
    }

    #[test]
    fn test_drop_interval_is_monotonic() {
        let timing = TimingConfig::default();
        let mut prev = u32::MAX;
        for level in 1..60 {
            let ms = drop_interval_ms(level, &timing);
            assert!(ms <= prev);
            assert!(ms >= timing.min_drop_ms);
            prev = ms;
        }
    }

    #[test]
    fn test_soft_drop_interval() {
        let timing = TimingConfig::default();
        // floor(850 * 0.12) = 102
        assert_eq!(soft_drop_interval_ms(850, &timing), 102);
        // floor(110 * 0.12) = 13, raised to the floor of 16
        assert_eq!(soft_drop_interval_ms(110, &timing), 16);
    }
}
