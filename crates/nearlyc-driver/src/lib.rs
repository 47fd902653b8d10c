//! Compilation driver for nearlyc.
//! nearlyc 编译驱动。
//!
//! [`Context`] runs scanning, parsing, AST construction and semantic
//! analysis for one translation unit, configured by [`Options`].

mod context;
mod logging;
mod options;

pub use context::{Context, SemanticAnalysis};
pub use logging::{LOG_VAR, init_tracing};
pub use options::{ARENA_VAR, ArenaChoice, CHUNK_SIZE_VAR, Mode, Options, parse_chunk_size};
