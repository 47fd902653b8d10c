//! The nearly-C scanner.
//! nearly-C 词法分析器。

use logos::Logos;
use nearlyc_common::{Location, Value, ValueKind};
use nearlyc_diagnostic::{Error, Result, syntax_error};
use nearlyc_syntax::{GrammarSymbol, Node, NodeId, Tree};
use tracing::debug;

use crate::token::{RawToken, char_literal_value};

/// Token nodes produced by [`Lexer::tokenize`], in source order.
#[derive(Debug, Clone)]
pub struct Tokens {
    pub ids: Vec<NodeId>,
    /// Location just past the last character of the input.
    pub eof_loc: Location,
}

/// The nearly-C scanner.
/// nearly-C 词法分析器。
///
/// Every token becomes a [`Node`] tagged with its [`GrammarSymbol`],
/// carrying its lexeme and the location of its first character.
pub struct Lexer<'src> {
    source: &'src str,
    /// Location of `source[scanned]`.
    loc: Location,
    scanned: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, srcfile: &str) -> Self {
        Self {
            source,
            loc: Location::new(srcfile, 1, 1),
            scanned: 0,
        }
    }

    /// Scan the whole input, allocating one node per token in `tree`.
    /// 扫描整个输入，为每个 token 在 `tree` 中分配一个节点。
    ///
    /// Stops at the first unrecognised character or malformed literal.
    pub fn tokenize(mut self, tree: &mut Tree) -> Result<Tokens> {
        let mut raw = RawToken::lexer(self.source);
        let mut ids = Vec::new();

        while let Some(result) = raw.next() {
            let span = raw.span();
            self.advance_to(span.start);
            let loc = self.loc.clone();
            let text = raw.slice();

            let node = match result {
                Ok(token) => make_token(token, text, loc)?,
                Err(()) => {
                    let c = text.chars().next().unwrap_or_default();
                    return syntax_error!(loc, "Unrecognized character '{}'", c);
                }
            };
            ids.push(tree.alloc(node));
            self.advance_to(span.end);
        }
        self.advance_to(self.source.len());

        debug!(tokens = ids.len(), file = self.loc.srcfile(), "scanned input");
        Ok(Tokens {
            ids,
            eof_loc: self.loc,
        })
    }

    fn advance_to(&mut self, offset: usize) {
        for ch in self.source[self.scanned..offset].chars() {
            if ch == '\n' {
                self.loc.next_line();
            } else {
                self.loc.advance(1);
            }
        }
        self.scanned = offset;
    }
}

fn make_token(token: RawToken, text: &str, loc: Location) -> Result<Node> {
    let symbol = token.symbol();
    let node = match symbol {
        GrammarSymbol::TokIntLit => {
            let value = Value::convert_str(text, ValueKind::Int)
                .map_err(|e| Error::syntax(loc.clone(), e.to_string()))?;
            Node::with_text_and_ival(symbol, text, value.to_i64_wrapping())
        }
        GrammarSymbol::TokFpLit => {
            Value::convert_str(text, ValueKind::Fp)
                .map_err(|e| Error::syntax(loc.clone(), e.to_string()))?;
            Node::with_text(symbol, text)
        }
        GrammarSymbol::TokCharLit => match char_literal_value(text) {
            Some(code) => Node::with_text_and_ival(symbol, text, code),
            None => return syntax_error!(loc, "Invalid character literal {}", text),
        },
        _ => Node::with_text(symbol, text),
    };
    Ok(node.at(loc))
}
