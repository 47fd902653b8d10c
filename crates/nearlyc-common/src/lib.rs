//! Common utilities and data structures for nearlyc.
//! nearlyc 的通用工具和数据结构。
//!
//! This crate provides foundational types used across the compiler:
//! - `Location`: Source position tracking
//! - `Value`: Compile-time numeric values
//! - `Arena`: Memory arenas for tree allocation
//! - `ensure_sufficient_stack`: Stack growth for recursive tree walks

mod arena;
mod location;
mod stack;
mod value;

pub use arena::{
    AnyArena, Arena, ArenaObject, BasicArena, ChunkedArena, DEFAULT_INITIAL_SIZE,
};
pub use location::Location;
pub use stack::ensure_sufficient_stack;
pub use value::{Value, ValueError, ValueKind};
