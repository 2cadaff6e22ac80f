//! Input handler driving a game through the public API

use contortris::core::{GameState, RawShape, Sequence, ShapeRegistry};
use contortris::input::InputHandler;
use contortris::types::{GameConfig, InputEvent, Intent};
use crossterm::event::KeyCode;

fn ready_game() -> GameState<Sequence> {
    let registry = ShapeRegistry::load(&[RawShape::new("dot", ["X"])], 10).unwrap();
    GameState::new(registry, GameConfig::default(), Sequence::new([0.5])).unwrap()
}

#[test]
fn test_soft_drop_held_before_start_takes_effect_on_key_repeat() {
    let mut game = ready_game();
    let mut input = InputHandler::new().with_key_release_timeout_ms(10_000);

    let first = input.handle_key_press(KeyCode::Down).unwrap();
    assert!(!game.apply(first), "soft drop is ignored before the game starts");
    assert!(input.soft_drop_held());

    game.apply(InputEvent::keyboard(Intent::Start));
    for _ in 0..10 {
        if let Some(ev) = input.handle_key_press(KeyCode::Down) {
            game.apply(ev);
        }
        for ev in input.update(16) {
            game.apply(ev);
        }
        game.tick(16);
    }
    assert!(game.soft_dropping());
}

#[test]
fn test_held_soft_drop_reapplies_after_resume() {
    let mut game = ready_game();
    let mut input = InputHandler::new().with_key_release_timeout_ms(10_000);
    game.start();
    game.pause();

    let ev = input.handle_key_press(KeyCode::Down).unwrap();
    game.apply(ev);
    assert!(!game.soft_dropping());

    assert!(game.apply(InputEvent::keyboard(Intent::Resume)));
    if let Some(held) = input.held_soft_drop() {
        game.apply(held);
    }
    assert!(game.soft_dropping());

    let off = input.handle_key_release(KeyCode::Down).unwrap();
    game.apply(off);
    assert!(!game.soft_dropping());
    assert_eq!(input.held_soft_drop(), None);
}
