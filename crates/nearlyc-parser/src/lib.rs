//! Parser for nearly-C.
//!
//! This crate provides a recursive descent parser that turns the token
//! nodes produced by `nearlyc-lexer` into a concrete parse tree, and the
//! [`AstBuilder`] that rewrites the parse tree into an AST.
//!
//! ## Errors
//!
//! Parsing stops at the first syntax error; there is no recovery. Input
//! nested deeper than [`MAX_NESTING_DEPTH`] is a syntax error.

mod ast_builder;
mod parser;

pub use ast_builder::AstBuilder;
pub use parser::{MAX_NESTING_DEPTH, Parser};

use nearlyc_diagnostic::Result;
use nearlyc_lexer::Lexer;
use nearlyc_syntax::{NodeId, Tree};
use tracing::debug;

/// Scan and parse `source`, returning the root `unit` node.
pub fn parse(tree: &mut Tree, source: &str, srcfile: &str) -> Result<NodeId> {
    let tokens = Lexer::new(source, srcfile).tokenize(tree)?;
    let root = Parser::new(tree, tokens).parse_unit()?;
    debug!(nodes = tree.len(), "built parse tree");
    Ok(root)
}

/// Rewrite the parse tree rooted at `root` into an AST.
pub fn build_ast(tree: &mut Tree, root: NodeId) -> NodeId {
    let ast = AstBuilder::new(tree).build_ast(root);
    debug!(nodes = tree.len(), "built AST");
    ast
}
