//! Indented tree dumps.
//! 缩进式树输出。
//!
//! Each node is printed on its own line, preceded by one indentation unit
//! per ancestor: `|  ` while that ancestor still has siblings to come,
//! three spaces otherwise, and `+--` for the immediate parent.

use std::fmt::Write;

use nearlyc_common::ensure_sufficient_stack;
use nearlyc_syntax::{NodeId, Tag, Tree};

/// Prints a tree with a pluggable tag naming function.
/// 使用可替换的标签命名函数打印树。
pub trait TreePrint {
    fn node_tag_to_string(&self, tag: Tag) -> String;

    /// Render the subtree rooted at `root`.
    fn print(&self, tree: &Tree, root: NodeId) -> String {
        let mut printer = Printer {
            names: self,
            levels: Vec::new(),
            output: String::new(),
        };
        printer.push_level(1);
        printer.print_node(tree, root);
        printer.output
    }
}

/// Names grammar symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseTreePrint;

impl TreePrint for ParseTreePrint {
    fn node_tag_to_string(&self, tag: Tag) -> String {
        match tag {
            Tag::Grammar(symbol) => symbol.name().to_string(),
            Tag::Ast(_) => "<unknown>".to_string(),
        }
    }
}

/// Names AST tags, falling back to grammar symbol names for tokens and
/// any parse tree nodes left in the AST.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstTreePrint;

impl TreePrint for AstTreePrint {
    fn node_tag_to_string(&self, tag: Tag) -> String {
        match tag {
            Tag::Ast(ast) => ast.name().to_string(),
            Tag::Grammar(_) => ParseTreePrint.node_tag_to_string(tag),
        }
    }
}

/// Position within one level of siblings.
struct Level {
    index: usize,
    siblings: usize,
}

struct Printer<'a, P: ?Sized> {
    names: &'a P,
    levels: Vec<Level>,
    output: String,
}

impl<P: TreePrint + ?Sized> Printer<'_, P> {
    fn push_level(&mut self, siblings: usize) {
        self.levels.push(Level { index: 0, siblings });
    }

    fn print_node(&mut self, tree: &Tree, id: NodeId) {
        let depth = self.levels.len();
        for i in 1..depth {
            let unit = if i == depth - 1 {
                "+--"
            } else if self.levels[i].index < self.levels[i].siblings {
                "|  "
            } else {
                "   "
            };
            self.output.push_str(unit);
        }

        let node = &tree[id];
        self.output.push_str(&self.names.node_tag_to_string(node.tag()));
        if !node.text().is_empty() {
            let _ = write!(self.output, "[{}]", node.text());
        }
        self.output.push('\n');
        self.levels[depth - 1].index += 1;

        self.push_level(node.num_kids());
        for kid in tree.children(id) {
            ensure_sufficient_stack(|| self.print_node(tree, kid));
        }
        self.levels.pop();
    }
}
