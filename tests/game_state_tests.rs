//! Game state scenarios driven through the public API

use contortris::core::{collides, GameState, LockedBlock, RawShape, RotationSpec, Sequence, ShapeRegistry};
use contortris::types::{GameConfig, InputEvent, InputKind, Intent};
use rand::{Rng, SeedableRng};

fn square() -> ShapeRegistry {
    ShapeRegistry::load(
        &[RawShape::new("o", ["XX", "XX"]).with_rotation(RotationSpec::Fixed)],
        10,
    )
    .unwrap()
}

fn started(registry: ShapeRegistry, config: GameConfig) -> GameState<Sequence> {
    let mut game = GameState::new(registry, config, Sequence::new([0.5])).unwrap();
    game.start();
    game
}

fn fill_row_except(game: &mut GameState<Sequence>, y: i32, holes: &[i32]) {
    let cols = game.board().cols() as i32;
    for x in (0..cols).filter(|x| !holes.contains(x)) {
        game.board_mut().set(
            x,
            y,
            Some(LockedBlock {
                shape: 0,
                rotation: 0,
                cell_x: 0,
                cell_y: 0,
            }),
        );
    }
}

#[test]
fn test_square_spawns_centered_and_falls_into_view() {
    let mut game = started(square(), GameConfig::default());
    let piece = game.active().unwrap();
    assert_eq!((piece.x, piece.y), (4, -2));

    game.tick(850);
    game.tick(850);
    let piece = game.active().unwrap();
    assert_eq!((piece.x, piece.y), (4, 0));
    let matrix = game.active_matrix().unwrap();
    assert!(!collides(game.board(), piece.x, piece.y, matrix));
}

#[test]
fn test_filling_the_gap_clears_one_line() {
    let dot = ShapeRegistry::load(&[RawShape::new("dot", ["X"])], 10).unwrap();
    let mut game = started(dot, GameConfig::default());
    fill_row_except(&mut game, 19, &[4]);
    let level = game.level();

    let mut event = None;
    for _ in 0..100 {
        game.tick(850);
        event = game.take_last_event();
        if event.is_some() {
            break;
        }
    }
    let event = event.unwrap();
    assert_eq!(event.lines_cleared, 1);
    assert_eq!(game.lines(), 1);
    assert_eq!(game.score(), 100 * level);
    assert!(game.board().is_empty());
}

#[test]
fn test_clearing_with_nothing_full_changes_nothing() {
    let mut game = started(square(), GameConfig::default());
    fill_row_except(&mut game, 19, &[0]);
    let before = game.board().clone();
    assert_eq!(game.clear_full_lines(), 0);
    assert_eq!(game.board(), &before);
    assert_eq!(game.score(), 0);
}

#[test]
fn test_lock_waits_for_keyboard_delay() {
    let mut game = started(square(), GameConfig::default().with_board(10, 2));
    game.tick(850); // y = -1
    game.tick(850); // y = 0, on the floor
    game.tick(850); // touch down
    assert!(game.lock_phase().in_grace());

    game.tick(249);
    assert!(game.take_last_event().is_none());
    assert!(game.board().is_empty());

    game.tick(2);
    assert!(game.take_last_event().is_some());
    assert!(game.board().is_occupied(4, 0));
    assert!(game.board().is_occupied(5, 1));
}

#[test]
fn test_touch_input_buys_more_time() {
    let mut game = started(square(), GameConfig::default().with_board(10, 2));
    game.tick(850);
    game.tick(850);
    game.apply(InputEvent::new(Intent::Rotate, InputKind::Touch));
    game.tick(850);
    game.tick(300);
    assert!(game.take_last_event().is_none());
    game.tick(151);
    assert!(game.take_last_event().is_some());
}

#[test]
fn test_blocked_spawn_ends_game() {
    let mut game = started(square(), GameConfig::default().with_board(10, 4));
    for y in 0..4 {
        fill_row_except(&mut game, y, &[0]);
    }
    let mut over = false;
    for _ in 0..20 {
        game.tick(850);
        if game.game_over() {
            over = true;
            break;
        }
    }
    assert!(over);
    assert!(!game.running());
    assert!(!game.apply(InputEvent::keyboard(Intent::MoveLeft)));

    assert!(game.apply(InputEvent::keyboard(Intent::Start)));
    assert!(game.running());
    assert!(game.board().is_empty());
}

/// Random play with the bundled shapes: score never drops and the active
/// piece never overlaps the stack.
#[test]
fn test_random_play_keeps_invariants() {
    let registry = ShapeRegistry::builtin(10).unwrap();
    let mut game = GameState::with_seed(registry, GameConfig::default(), 31).unwrap();
    game.start();

    let intents = [
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::Rotate,
        Intent::SoftDropOn,
        Intent::SoftDropOff,
    ];
    let mut rng = rand::rngs::StdRng::seed_from_u64(5);
    let mut last_score = 0;

    for _ in 0..20_000 {
        if rng.random_bool(0.3) {
            let intent = intents[rng.random_range(0..intents.len())];
            game.apply(InputEvent::keyboard(intent));
        }
        game.tick(rng.random_range(0..=50));

        assert!(game.score() >= last_score);
        last_score = game.score();

        if game.game_over() {
            game.apply(InputEvent::keyboard(Intent::Start));
            last_score = 0;
            continue;
        }
        let piece = game.active().unwrap();
        let matrix = game.active_matrix().unwrap();
        assert!(!collides(game.board(), piece.x, piece.y, matrix));
    }
}
