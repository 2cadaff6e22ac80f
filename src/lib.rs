//! Contortris (workspace facade crate).
//!
//! Re-exports the workspace crates under short names so the binary, the
//! integration tests and the benches share one import path:
//! `contortris::{core, input, term, types}`.

pub use contortris_core as core;
pub use contortris_input as input;
pub use contortris_term as term;
pub use contortris_types as types;
