//! Adaptive piece selection.
//!
//! The higher the locked stack reaches, the easier the pieces handed out.
//! Within the allowed set, pieces are drawn by their frequency weight.

use crate::board::Board;
use crate::rng::RandomSource;
use crate::shapes::ShapeDefinition;
use crate::types::AssistConfig;

/// How close the stack is to the top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DangerZone {
    /// No restriction
    Normal,
    /// Difficulty ≤ 2, occasionally waived
    Soft,
    /// Difficulty ≤ 1, no exceptions
    Strict,
}

impl DangerZone {
    pub fn from_board(board: &Board, assist: &AssistConfig) -> Self {
        match board.highest_occupied_row() {
            Some(y) if y < assist.top_rows_for_diff1_only as usize => DangerZone::Strict,
            Some(y) if y < assist.top_rows_for_diff2_only as usize => DangerZone::Soft,
            _ => DangerZone::Normal,
        }
    }

    /// Human-readable label for the debug panel.
    pub fn label(&self) -> &'static str {
        match self {
            DangerZone::Normal => "normal",
            DangerZone::Soft => "assist: difficulty ≤ 2 (sometimes >2)",
            DangerZone::Strict => "assist: difficulty ≤ 1 (strict)",
        }
    }

    /// Nominal difficulty cap, `None` when unlimited.
    pub fn cap(&self) -> Option<f64> {
        match self {
            DangerZone::Normal => None,
            DangerZone::Soft => Some(2.0),
            DangerZone::Strict => Some(1.0),
        }
    }
}

/// Pick the index of the next shape.
///
/// In the soft zone one random value decides whether the cap is waived; a
/// second value drives the weighted pick. Returns `None` only for an empty
/// shape list.
pub fn select_shape<R: RandomSource + ?Sized>(
    shapes: &[ShapeDefinition],
    zone: DangerZone,
    assist: &AssistConfig,
    rng: &mut R,
) -> Option<usize> {
    if shapes.is_empty() {
        return None;
    }

    let cap = match zone {
        DangerZone::Soft if rng.next_unit() < assist.allow_harder_than_2_prob => None,
        _ => zone.cap(),
    };

    let mut candidates: Vec<usize> = (0..shapes.len())
        .filter(|&i| shapes[i].frequency > 0.0 && cap.map_or(true, |c| shapes[i].difficulty <= c))
        .collect();
    if candidates.is_empty() {
        candidates = (0..shapes.len())
            .filter(|&i| shapes[i].frequency > 0.0)
            .collect();
    }
    if candidates.is_empty() {
        return Some(uniform_index(shapes.len(), rng));
    }

    let total: f64 = candidates.iter().map(|&i| shapes[i].frequency).sum();
    if total <= 0.0 {
        return Some(candidates[uniform_index(candidates.len(), rng)]);
    }

    let mut r = rng.next_unit() * total;
    for &i in &candidates {
        r -= shapes[i].frequency;
        if r <= 0.0 {
            return Some(i);
        }
    }
    candidates.last().copied()
}

fn uniform_index<R: RandomSource + ?Sized>(len: usize, rng: &mut R) -> usize {
    ((rng.next_unit() * len as f64) as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::test_block;
    use crate::rng::{seeded, Sequence};
    use crate::shapes::{RawShape, ShapeRegistry};

    fn registry(specs: &[(&str, f64, f64)]) -> ShapeRegistry {
        let raws: Vec<RawShape> = specs
            .iter()
            .map(|&(id, difficulty, frequency)| {
                RawShape::new(id, ["X"])
                    .with_difficulty(difficulty)
                    .with_frequency(frequency)
            })
            .collect();
        ShapeRegistry::load(&raws, 10).unwrap()
    }

    fn board_with_block_at_row(y: i32) -> Board {
        let mut board = Board::new(10, 20);
        board.set(4, y, Some(test_block()));
        board
    }

    #[test]
    fn test_zone_thresholds() {
        let assist = AssistConfig::default();
        assert_eq!(
            DangerZone::from_board(&Board::new(10, 20), &assist),
            DangerZone::Normal
        );
        assert_eq!(
            DangerZone::from_board(&board_with_block_at_row(6), &assist),
            DangerZone::Normal
        );
        assert_eq!(
            DangerZone::from_board(&board_with_block_at_row(5), &assist),
            DangerZone::Soft
        );
        assert_eq!(
            DangerZone::from_board(&board_with_block_at_row(3), &assist),
            DangerZone::Soft
        );
        assert_eq!(
            DangerZone::from_board(&board_with_block_at_row(2), &assist),
            DangerZone::Strict
        );
    }

    #[test]
    fn test_weighted_walk_uses_running_subtraction() {
        let reg = registry(&[("a", 1.0, 0.5), ("b", 1.0, 0.5)]);
        let assist = AssistConfig::default();
        // 0.5 * 1.0 - 0.5 = 0 -> first candidate.
        let mut seq = Sequence::new([0.5]);
        assert_eq!(
            select_shape(reg.shapes(), DangerZone::Normal, &assist, &mut seq),
            Some(0)
        );
        let mut seq = Sequence::new([0.51]);
        assert_eq!(
            select_shape(reg.shapes(), DangerZone::Normal, &assist, &mut seq),
            Some(1)
        );
    }

    #[test]
    fn test_zero_frequency_never_drawn() {
        let reg = registry(&[("never", 1.0, 0.0), ("always", 1.0, 0.3)]);
        let assist = AssistConfig::default();
        let mut rng = seeded(1);
        for _ in 0..500 {
            assert_eq!(
                select_shape(reg.shapes(), DangerZone::Normal, &assist, &mut rng),
                Some(1)
            );
        }
    }

    #[test]
    fn test_strict_zone_caps_difficulty() {
        let reg = registry(&[("easy", 1.0, 0.2), ("hard", 3.0, 1.0)]);
        let assist = AssistConfig::default();
        let mut rng = seeded(3);
        for _ in 0..1000 {
            assert_eq!(
                select_shape(reg.shapes(), DangerZone::Strict, &assist, &mut rng),
                Some(0)
            );
        }
    }

    #[test]
    fn test_cap_relaxes_when_nothing_qualifies() {
        let reg = registry(&[("hard", 3.0, 1.0), ("harder", 4.0, 1.0)]);
        let assist = AssistConfig::default();
        let mut seq = Sequence::new([0.9]);
        assert_eq!(
            select_shape(reg.shapes(), DangerZone::Strict, &assist, &mut seq),
            Some(1)
        );
    }

    #[test]
    fn test_all_zero_frequency_falls_back_to_uniform() {
        let reg = registry(&[("a", 1.0, 0.0), ("b", 1.0, 0.0), ("c", 1.0, 0.0)]);
        let assist = AssistConfig::default();
        let mut seq = Sequence::new([0.7]);
        assert_eq!(
            select_shape(reg.shapes(), DangerZone::Normal, &assist, &mut seq),
            Some(2)
        );
        assert_eq!(seq.consumed(), 1);
    }

    #[test]
    fn test_soft_zone_waiver_consumes_first_value() {
        let reg = registry(&[("easy", 1.0, 1.0), ("hard", 3.0, 1.0)]);
        let assist = AssistConfig::default();

        // 0.1 < 0.15 waives the cap; 0.9 * 2.0 lands on "hard".
        let mut seq = Sequence::new([0.1, 0.9]);
        assert_eq!(
            select_shape(reg.shapes(), DangerZone::Soft, &assist, &mut seq),
            Some(1)
        );
        assert_eq!(seq.consumed(), 2);

        // 0.5 keeps the cap, so only "easy" qualifies.
        let mut seq = Sequence::new([0.5, 0.9]);
        assert_eq!(
            select_shape(reg.shapes(), DangerZone::Soft, &assist, &mut seq),
            Some(0)
        );
    }

    #[test]
    fn test_empty_list() {
        let assist = AssistConfig::default();
        let mut seq = Sequence::new([0.5]);
        assert_eq!(select_shape(&[], DangerZone::Normal, &assist, &mut seq), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(DangerZone::Normal.label(), "normal");
        assert_eq!(DangerZone::Strict.cap(), Some(1.0));
        assert_eq!(DangerZone::Normal.cap(), None);
    }
}
