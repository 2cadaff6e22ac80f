//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds every game rule and no I/O. A frontend owns a
//! [`GameState`], feeds it [`InputEvent`](types::InputEvent)s and elapsed
//! time, and reads the state back for drawing.
//!
//! # Module Structure
//!
//! - [`shapes`]: JSON shape loading, rotation states and pixel paint
//! - [`matrix`]: small dense grids (occupancy and color)
//! - [`board`]: the locked-block grid, collision and row clearing
//! - [`piece`]: the active piece, wall kicks and lock phases
//! - [`difficulty`]: danger zones and weighted shape selection
//! - [`scoring`]: line-clear points, levels and gravity speed
//! - [`game_state`]: the orchestrator tying it all together
//! - [`rng`]: pluggable random sources
//!
//! # Game Rules
//!
//! - **Arbitrary shapes**: any polyomino fitting the board, with per-shape
//!   difficulty, spawn frequency and allowed rotations
//! - **Adaptive difficulty**: as the stack nears the top, harder shapes stop
//!   spawning (with an occasional waiver in the softer zone)
//! - **Wall kicks**: rotations try five sideways offsets and one upward nudge
//! - **Lock delay**: grounded pieces lock after a grace period, longer right
//!   after touch input
//! - **Scoring**: table points for 1-4 lines times the level; levels speed
//!   gravity up geometrically
//!
//! # Example
//!
//! ```
//! use contortris_core::{GameState, ShapeRegistry};
//! use contortris_core::types::{GameConfig, InputEvent, Intent};
//!
//! let config = GameConfig::default();
//! let shapes = ShapeRegistry::builtin(config.board.cols as usize).unwrap();
//! let mut game = GameState::with_seed(shapes, config, 12345).unwrap();
//! game.start();
//!
//! game.apply(InputEvent::keyboard(Intent::MoveRight));
//! game.apply(InputEvent::keyboard(Intent::Rotate));
//! game.tick(16);
//!
//! assert!(game.running());
//! assert_eq!(game.score(), 0);
//! ```
//!
//! # Timing
//!
//! The caller measures frame time and passes it to
//! [`GameState::tick`](game_state::GameState::tick), clamped to
//! `timing.max_frame_dt_ms` so a stalled frame cannot drop a piece through
//! the stack.

pub mod board;
pub mod color;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod game_state;
pub mod matrix;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod shapes;

pub use contortris_types as types;

// Re-export commonly used types for convenience
pub use board::{collides, Board, Cell, LockedBlock};
pub use config::{parse_config, validate_config};
pub use difficulty::{select_shape, DangerZone};
pub use error::{ConfigurationError, Result};
pub use game_state::{Diagnostics, GameState};
pub use matrix::{Grid, Matrix};
pub use piece::{ActivePiece, LockPhase, WALL_KICKS};
pub use rng::{seeded, FnSource, GameRng, RandomSource, Sequence};
pub use scoring::{calculate_score, drop_interval_ms, level_for_lines, line_clear_points};
pub use shapes::{Paint, RawShape, RotationSpec, ShapeDefinition, ShapeRegistry, Style};
