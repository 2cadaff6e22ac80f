//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget/layout libraries and instead renders into a simple
//! framebuffer that is diffed and flushed to the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Show shape colors, bevels and pixel art at 2x2 colors per board cell
//! - Expose the board rectangle so pointer input can be hit-tested

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use contortris_core as core;
pub use contortris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{block_colors, status_label, AnchorY, GameView, Viewport};
pub use renderer::{encode_frame, TerminalRenderer};
