//! Lexical analysis for nearly-C.
//! nearly-C 词法分析模块。
//!
//! This crate turns source text into token nodes stored in a [`Tree`].
//! 本 crate 将源代码转换为存放在 [`Tree`] 中的 token 节点。
//!
//! [`Tree`]: nearlyc_syntax::Tree

mod lexer;
mod token;

pub use lexer::{Lexer, Tokens};
