//! Tree printers for nearlyc.
//! nearlyc 的树打印器。
//!
//! [`ParseTreePrint`] and [`AstTreePrint`] produce indented text dumps of
//! parse trees and ASTs; [`PrintGraph`] produces Graphviz input.
//! [`ParseTreePrint`] 和 [`AstTreePrint`] 输出缩进文本，[`PrintGraph`] 输出 Graphviz 格式。

mod graph;
mod printer;

pub use graph::PrintGraph;
pub use printer::{AstTreePrint, ParseTreePrint, TreePrint};
