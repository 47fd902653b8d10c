//! Output formatting utilities.
//! 输出格式化工具。

use std::fmt::Write;
use std::fs;

use nearlyc_diagnostic::{Error, emit};
use nearlyc_syntax::{NodeId, Tree};

/// One line per token: `<line>:<col> <TAG_NAME>[<text>]`.
/// 每个 token 一行。
pub fn tokens(tree: &Tree, ids: &[NodeId]) -> String {
    let mut out = String::new();
    for &id in ids {
        let tok = &tree[id];
        let _ = writeln!(
            out,
            "{}:{} {}[{}]",
            tok.loc().line(),
            tok.loc().col(),
            tok.tag().name(),
            tok.text()
        );
    }
    out
}

/// Report a compilation error on stderr.
/// 在标准错误输出上报告编译错误。
///
/// The one-line diagnostic is always printed. In verbose mode a source
/// snippet follows when the error has a location in a readable file.
pub fn error(err: &Error, verbose: bool) {
    eprintln!("{}", err.to_diagnostic_line());
    if !verbose || !err.loc().is_valid() {
        return;
    }
    if let Ok(source) = fs::read_to_string(err.loc().srcfile()) {
        let _ = emit(&source, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearlyc_syntax::{GrammarSymbol, Node};

    #[test]
    fn test_tokens() {
        let mut tree = Tree::new();
        let a = tree.alloc(Node::with_text(GrammarSymbol::TokIdent, "a"));
        assert_eq!(tokens(&tree, &[a]), "-1:-1 TOK_IDENT[a]\n");
    }
}
