//! Graphviz output.
//! Graphviz 输出。

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use nearlyc_common::ensure_sufficient_stack;
use nearlyc_syntax::{NodeId, Tag, Tree};

use crate::{AstTreePrint, TreePrint};

/// Renders a tree as a Graphviz `digraph`, one rank per depth.
///
/// Node names are `<tag>_<n>`, where `n` counts earlier nodes with the same
/// tag, followed by the node's text when it has any. `TOK_IDENT` is shown as
/// `identifier`.
pub struct PrintGraph<'a> {
    tree: &'a Tree,
    root: NodeId,
}

#[derive(Default)]
struct GraphState {
    tag_counts: HashMap<Tag, usize>,
    levels: BTreeMap<String, usize>,
    edges: BTreeMap<String, Vec<String>>,
}

impl<'a> PrintGraph<'a> {
    pub fn new(tree: &'a Tree, root: NodeId) -> Self {
        Self { tree, root }
    }

    pub fn render(&self) -> String {
        let mut state = GraphState::default();
        self.visit(&mut state, self.root, None, 0);

        let mut out = String::new();
        out.push_str("digraph ast {\n");
        out.push_str("  graph [ordering=\"out\"];\n");
        for (name, level) in &state.levels {
            let _ = writeln!(out, "  {{ rank = {level}; \"{name}\"; }}");
        }
        for (parent, kids) in &state.edges {
            for kid in kids {
                let _ = writeln!(out, "  \"{parent}\" -> \"{kid}\";");
            }
        }
        out.push_str("}\n");
        out
    }

    /// Returns the deepest level reached below `id`.
    fn visit(&self, state: &mut GraphState, id: NodeId, parent: Option<&str>, level: usize) -> usize {
        let node = &self.tree[id];
        let count = state.tag_counts.entry(node.tag()).or_insert(0);
        let index = *count;
        *count += 1;

        let mut tag_name = AstTreePrint.node_tag_to_string(node.tag());
        if tag_name == "TOK_IDENT" {
            tag_name = "identifier".to_string();
        }
        let mut name = format!("{tag_name}_{index}");
        if !node.text().is_empty() {
            let _ = write!(name, "\\n[{}]", escape(node.text()));
        }

        state.levels.insert(name.clone(), level);
        if let Some(parent) = parent {
            state
                .edges
                .entry(parent.to_string())
                .or_default()
                .push(name.clone());
        }

        let mut max_level = level;
        for kid in self.tree.children(id) {
            let kid_level =
                ensure_sufficient_stack(|| self.visit(state, kid, Some(name.as_str()), level + 1));
            max_level = max_level.max(kid_level);
        }
        max_level
    }
}

/// Escape `text` for use inside a quoted DOT identifier.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
