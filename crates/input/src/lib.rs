//! Terminal input module (engine-facing).
//!
//! This crate is independent of any UI framework. It maps `crossterm` key
//! events into [`Intent`](crate::types::Intent)s, turns mouse presses on the
//! board into touch-style tap zones, and drives hold-repeat timing for both
//! (including terminals without key-release events).

pub mod handler;
pub mod map;
pub mod zones;

pub use contortris_types as types;

pub use handler::{HorizontalDirection, InputHandler};
pub use map::{handle_key_event, is_debug_toggle, is_held_key, should_quit};
pub use zones::{hit_test, DoubleTap, TapZone, DOUBLE_TAP_MS};
