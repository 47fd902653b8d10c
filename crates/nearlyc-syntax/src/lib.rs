//! Tree nodes, tags and traversal for nearlyc.
//!
//! The same [`Node`] type represents tokens, parse tree nonterminals and
//! AST nodes; the [`Tag`] tells them apart. All nodes of a translation
//! unit live in one arena-backed [`Tree`].

mod node;
mod tag;
mod visitor;

pub use node::{Node, NodeId, Preorder, Tree};
pub use tag::{AST_TAG_BASE, AstTag, GrammarSymbol, NONTERMINAL_BASE, TOKEN_BASE, Tag};
pub use visitor::AstVisitor;
