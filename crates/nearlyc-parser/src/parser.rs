//! The nearly-C parser.
//! nearly-C 语法分析器。
//!
//! A recursive descent parser that builds the concrete parse tree. Every
//! production becomes a node tagged with its nonterminal, and every token
//! it consumed (punctuation included) is one of that node's children, in
//! source order. Right-recursive lists nest to the right; binary operator
//! levels nest to the left.

use nearlyc_common::{Location, ensure_sufficient_stack};
use nearlyc_diagnostic::{Error, Result};
use nearlyc_lexer::Tokens;
use nearlyc_syntax::{GrammarSymbol as G, NodeId, Tag, Tree};

/// Keywords that may start a `basic_type`.
const BASIC_TYPE_KEYWORDS: &[G] = &[
    G::TokConst,
    G::TokVolatile,
    G::TokSigned,
    G::TokUnsigned,
    G::TokVoid,
    G::TokChar,
    G::TokShort,
    G::TokInt,
    G::TokLong,
    G::TokFloat,
    G::TokDouble,
];

/// Binary operator levels from loosest to tightest: the nonterminal, the
/// operator tokens it accepts.
const BINARY_LEVELS: &[(G, &[G])] = &[
    (G::NodeLogicalOrExpression, &[G::TokLogicalOr]),
    (G::NodeLogicalAndExpression, &[G::TokLogicalAnd]),
    (G::NodeEqualityExpression, &[G::TokEquality, G::TokInequality]),
    (
        G::NodeRelationalExpression,
        &[G::TokLt, G::TokLte, G::TokGt, G::TokGte],
    ),
    (G::NodeAdditiveExpression, &[G::TokPlus, G::TokMinus]),
    (
        G::NodeMultiplicativeExpression,
        &[G::TokAsterisk, G::TokDivide, G::TokMod],
    ),
];

/// How deeply statements, expressions and declarators may nest before
/// the input is rejected.
pub const MAX_NESTING_DEPTH: usize = 256;

/// The nearly-C parser.
/// nearly-C 语法分析器。
pub struct Parser<'t> {
    tree: &'t mut Tree,
    tokens: Vec<NodeId>,
    pos: usize,
    eof_loc: Location,
    depth: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tree: &'t mut Tree, tokens: Tokens) -> Self {
        Self {
            tree,
            tokens: tokens.ids,
            pos: 0,
            eof_loc: tokens.eof_loc,
            depth: 0,
        }
    }

    /// Parse a complete translation unit and return the `unit` node.
    /// 解析完整的翻译单元并返回 `unit` 节点。
    pub fn parse_unit(&mut self) -> Result<NodeId> {
        let mut decls = vec![self.parse_top_level_declaration()?];
        while !self.at_end() {
            decls.push(self.parse_top_level_declaration()?);
        }
        Ok(self.right_nested(G::NodeUnit, decls, None))
    }

    // ========== Declarations ==========

    fn parse_top_level_declaration(&mut self) -> Result<NodeId> {
        let mut kids = Vec::new();
        match self.peek() {
            Some(G::TokStruct | G::TokUnion) if self.peek_at(2) == Some(G::TokLbrace) => {
                kids.push(self.parse_struct_type_definition()?);
            }
            Some(G::TokStatic | G::TokExtern) => {
                kids.push(self.bump());
                kids.push(self.parse_function_or_variable()?);
            }
            _ => kids.push(self.parse_function_or_variable()?),
        }
        Ok(self.node(G::NodeTopLevelDeclaration, kids))
    }

    fn parse_function_or_variable(&mut self) -> Result<NodeId> {
        let ty = self.parse_type()?;
        let inner = if self.peek() == Some(G::TokIdent) && self.peek_at(1) == Some(G::TokLparen) {
            self.parse_function_rest(ty)?
        } else {
            self.parse_variable_rest(ty)?
        };
        Ok(self.node(G::NodeFunctionOrVariableDeclarationOrDefinition, vec![inner]))
    }

    fn parse_simple_variable_declaration(&mut self) -> Result<NodeId> {
        let ty = self.parse_type()?;
        self.parse_variable_rest(ty)
    }

    /// The part of a `simple_variable_declaration` after its type.
    fn parse_variable_rest(&mut self, ty: NodeId) -> Result<NodeId> {
        let declarators = self.parse_declarator_list()?;
        let semi = self.expect(G::TokSemicolon)?;
        Ok(self.node(G::NodeSimpleVariableDeclaration, vec![ty, declarators, semi]))
    }

    /// The part of a `function_definition_or_declaration` after its
    /// return type.
    fn parse_function_rest(&mut self, ty: NodeId) -> Result<NodeId> {
        let name = self.expect(G::TokIdent)?;
        let lparen = self.expect(G::TokLparen)?;
        let params = if self.peek() == Some(G::TokRparen) {
            self.node(G::NodeOptParameterList, vec![])
        } else {
            let list = self.parse_parameter_list()?;
            self.node(G::NodeOptParameterList, vec![list])
        };
        let rparen = self.expect(G::TokRparen)?;
        let tail = if self.peek() == Some(G::TokLbrace) {
            self.parse_compound_statement()?
        } else {
            self.expect(G::TokSemicolon)?
        };
        Ok(self.node(
            G::NodeFunctionDefinitionOrDeclaration,
            vec![ty, name, lparen, params, rparen, tail],
        ))
    }

    fn parse_declarator_list(&mut self) -> Result<NodeId> {
        self.parse_separated(G::NodeDeclaratorList, Self::parse_declarator)
    }

    fn parse_declarator(&mut self) -> Result<NodeId> {
        self.nested(Self::parse_declarator_inner)
    }

    fn parse_declarator_inner(&mut self) -> Result<NodeId> {
        if self.peek() == Some(G::TokAsterisk) {
            let star = self.bump();
            let inner = self.parse_declarator()?;
            return Ok(self.node(G::NodeDeclarator, vec![star, inner]));
        }
        let ident = self.expect(G::TokIdent)?;
        let mut np = self.node(G::NodeNonPointerDeclarator, vec![ident]);
        while self.peek() == Some(G::TokLbracket) {
            let lbracket = self.bump();
            let size = self.expect(G::TokIntLit)?;
            let rbracket = self.expect(G::TokRbracket)?;
            np = self.node(
                G::NodeNonPointerDeclarator,
                vec![np, lbracket, size, rbracket],
            );
        }
        Ok(self.node(G::NodeDeclarator, vec![np]))
    }

    fn parse_parameter_list(&mut self) -> Result<NodeId> {
        self.parse_separated(G::NodeParameterList, |p| {
            let ty = p.parse_type()?;
            let declarator = p.parse_declarator()?;
            Ok(p.node(G::NodeParameter, vec![ty, declarator]))
        })
    }

    // ========== Types ==========

    fn parse_type(&mut self) -> Result<NodeId> {
        let kids = match self.peek() {
            Some(G::TokStruct | G::TokUnion) => {
                let keyword = self.bump();
                let name = self.expect(G::TokIdent)?;
                vec![keyword, name]
            }
            _ => vec![self.parse_basic_type()?],
        };
        Ok(self.node(G::NodeType, kids))
    }

    fn parse_basic_type(&mut self) -> Result<NodeId> {
        let mut keywords = Vec::new();
        loop {
            match self.peek() {
                Some(sym) if BASIC_TYPE_KEYWORDS.contains(&sym) => {
                    let tok = self.bump();
                    keywords.push(self.node(G::NodeBasicTypeKeyword, vec![tok]));
                }
                _ if keywords.is_empty() => return Err(self.unexpected()),
                _ => break,
            }
        }
        Ok(self.right_nested(G::NodeBasicType, keywords, None))
    }

    fn parse_struct_type_definition(&mut self) -> Result<NodeId> {
        let keyword = self.bump();
        let name = self.expect(G::TokIdent)?;
        let lbrace = self.expect(G::TokLbrace)?;
        let mut fields = Vec::new();
        while self.peek() != Some(G::TokRbrace) {
            fields.push(self.parse_simple_variable_declaration()?);
        }
        let opt = self.opt_list(G::NodeOptFieldDefinitionList, G::NodeFieldDefinitionList, fields);
        let rbrace = self.expect(G::TokRbrace)?;
        let semi = self.expect(G::TokSemicolon)?;
        Ok(self.node(
            G::NodeStructTypeDefinition,
            vec![keyword, name, lbrace, opt, rbrace, semi],
        ))
    }

    // ========== Statements ==========

    fn parse_compound_statement(&mut self) -> Result<NodeId> {
        let lbrace = self.expect(G::TokLbrace)?;
        let mut stmts = Vec::new();
        while self.peek() != Some(G::TokRbrace) {
            stmts.push(self.parse_statement()?);
        }
        let opt = self.opt_list(G::NodeOptStatementList, G::NodeStatementList, stmts);
        let rbrace = self.expect(G::TokRbrace)?;
        Ok(self.node(G::NodeCompoundStatement, vec![lbrace, opt, rbrace]))
    }

    fn parse_statement(&mut self) -> Result<NodeId> {
        self.nested(Self::parse_statement_inner)
    }

    fn parse_statement_inner(&mut self) -> Result<NodeId> {
        let kids = match self.peek() {
            Some(G::TokSemicolon) => vec![self.bump()],
            Some(G::TokLbrace) => vec![self.parse_compound_statement()?],
            Some(G::TokReturn) => {
                let ret = self.bump();
                if self.peek() == Some(G::TokSemicolon) {
                    vec![ret, self.bump()]
                } else {
                    let e = self.parse_expression()?;
                    vec![ret, e, self.expect(G::TokSemicolon)?]
                }
            }
            Some(G::TokWhile) => {
                let kw = self.bump();
                let (lparen, cond, rparen) = self.parse_parenthesized()?;
                let body = self.parse_statement()?;
                vec![kw, lparen, cond, rparen, body]
            }
            Some(G::TokDo) => {
                let kw = self.bump();
                let body = self.parse_statement()?;
                let while_kw = self.expect(G::TokWhile)?;
                let (lparen, cond, rparen) = self.parse_parenthesized()?;
                let semi = self.expect(G::TokSemicolon)?;
                vec![kw, body, while_kw, lparen, cond, rparen, semi]
            }
            Some(G::TokFor) => {
                let kw = self.bump();
                let lparen = self.expect(G::TokLparen)?;
                let init = self.parse_expression()?;
                let semi1 = self.expect(G::TokSemicolon)?;
                let cond = self.parse_expression()?;
                let semi2 = self.expect(G::TokSemicolon)?;
                let step = self.parse_expression()?;
                let rparen = self.expect(G::TokRparen)?;
                let body = self.parse_statement()?;
                vec![kw, lparen, init, semi1, cond, semi2, step, rparen, body]
            }
            Some(G::TokIf) => {
                let kw = self.bump();
                let (lparen, cond, rparen) = self.parse_parenthesized()?;
                let then = self.parse_statement()?;
                let mut kids = vec![kw, lparen, cond, rparen, then];
                if self.peek() == Some(G::TokElse) {
                    kids.push(self.bump());
                    kids.push(self.parse_statement()?);
                }
                kids
            }
            Some(sym) if starts_type(sym) => vec![self.parse_simple_variable_declaration()?],
            _ => {
                let e = self.parse_expression()?;
                vec![e, self.expect(G::TokSemicolon)?]
            }
        };
        Ok(self.node(G::NodeStatement, kids))
    }

    fn parse_parenthesized(&mut self) -> Result<(NodeId, NodeId, NodeId)> {
        let lparen = self.expect(G::TokLparen)?;
        let e = self.parse_expression()?;
        let rparen = self.expect(G::TokRparen)?;
        Ok((lparen, e, rparen))
    }

    // ========== Expressions ==========

    /// `expression` is represented by its `assignment_expression` node.
    fn parse_expression(&mut self) -> Result<NodeId> {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> Result<NodeId> {
        self.nested(Self::parse_assignment_expression_inner)
    }

    fn parse_assignment_expression_inner(&mut self) -> Result<NodeId> {
        let lhs = self.parse_binary_level(0)?;
        if self.peek() != Some(G::TokAssign) {
            return Ok(self.node(G::NodeAssignmentExpression, vec![lhs]));
        }
        // Only a unary expression may be assigned to.
        let Some(target) = self.as_unary_expression(lhs) else {
            return Err(self.unexpected());
        };
        let assign = self.bump();
        let rhs = self.parse_assignment_expression()?;
        Ok(self.node(G::NodeAssignmentExpression, vec![target, assign, rhs]))
    }

    /// Parse binary operator level `level` of [`BINARY_LEVELS`].
    fn parse_binary_level(&mut self, level: usize) -> Result<NodeId> {
        let Some(&(symbol, ops)) = BINARY_LEVELS.get(level) else {
            return self.parse_unary_expression();
        };
        let first = self.parse_binary_level(level + 1)?;
        let mut left = self.node(symbol, vec![first]);
        while self.peek().is_some_and(|sym| ops.contains(&sym)) {
            let op = self.bump();
            let right = self.parse_binary_level(level + 1)?;
            left = self.node(symbol, vec![left, op, right]);
        }
        Ok(left)
    }

    /// The `unary_expression` at the bottom of a chain of single-child
    /// binary level nodes, if `id` is such a chain.
    fn as_unary_expression(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            let node = &self.tree[id];
            if node.tag() == G::NodeUnaryExpression {
                return Some(id);
            }
            let is_level = BINARY_LEVELS.iter().any(|&(sym, _)| node.tag() == sym);
            if !is_level || node.num_kids() != 1 {
                return None;
            }
            id = node.kid(0);
        }
    }

    fn parse_unary_expression(&mut self) -> Result<NodeId> {
        self.nested(Self::parse_unary_expression_inner)
    }

    fn parse_unary_expression_inner(&mut self) -> Result<NodeId> {
        let kids = match self.peek() {
            Some(G::TokMinus | G::TokLogicalNot | G::TokAsterisk | G::TokAmpersand) => {
                let op = self.bump();
                vec![op, self.parse_unary_expression()?]
            }
            _ => vec![self.parse_postfix_expression()?],
        };
        Ok(self.node(G::NodeUnaryExpression, kids))
    }

    fn parse_postfix_expression(&mut self) -> Result<NodeId> {
        let primary = self.parse_primary_expression()?;
        let mut expr = self.node(G::NodePostfixExpression, vec![primary]);
        loop {
            let kids = match self.peek() {
                Some(G::TokLbracket) => {
                    let lbracket = self.bump();
                    let index = self.parse_expression()?;
                    let rbracket = self.expect(G::TokRbracket)?;
                    vec![expr, lbracket, index, rbracket]
                }
                Some(G::TokLparen) => {
                    let lparen = self.bump();
                    let args = if self.peek() == Some(G::TokRparen) {
                        self.node(G::NodeOptArgumentExpressionList, vec![])
                    } else {
                        let list = self.parse_separated(
                            G::NodeArgumentExpressionList,
                            Self::parse_assignment_expression,
                        )?;
                        self.node(G::NodeOptArgumentExpressionList, vec![list])
                    };
                    let rparen = self.expect(G::TokRparen)?;
                    vec![expr, lparen, args, rparen]
                }
                Some(G::TokDot | G::TokArrow) => {
                    let op = self.bump();
                    let field = self.expect(G::TokIdent)?;
                    vec![expr, op, field]
                }
                _ => break,
            };
            expr = self.node(G::NodePostfixExpression, kids);
        }
        Ok(expr)
    }

    fn parse_primary_expression(&mut self) -> Result<NodeId> {
        let kids = match self.peek() {
            Some(
                G::TokIdent | G::TokIntLit | G::TokFpLit | G::TokCharLit | G::TokStrLit,
            ) => vec![self.bump()],
            Some(G::TokLparen) => {
                let (lparen, e, rparen) = self.parse_parenthesized()?;
                vec![lparen, e, rparen]
            }
            _ => return Err(self.unexpected()),
        };
        Ok(self.node(G::NodePrimaryExpression, kids))
    }

    /// Run one level of a recursive production, rejecting input nested
    /// deeper than [`MAX_NESTING_DEPTH`].
    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Result<NodeId>) -> Result<NodeId> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error_here("syntax error, nesting too deep"));
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| parse(self));
        self.depth -= 1;
        result
    }

    // ========== Tree construction ==========

    fn node(&mut self, symbol: G, kids: Vec<NodeId>) -> NodeId {
        self.tree.alloc_with_kids(symbol, kids)
    }

    /// Build `list : item [sep list]` from already parsed items, nesting to
    /// the right. `seps` holds the separator token between each pair.
    fn right_nested(
        &mut self,
        symbol: G,
        mut items: Vec<NodeId>,
        seps: Option<Vec<NodeId>>,
    ) -> NodeId {
        let mut seps = seps.unwrap_or_default();
        let Some(last) = items.pop() else {
            panic!("{} must have at least one item", symbol.name());
        };
        let mut tail = self.node(symbol, vec![last]);
        while let Some(item) = items.pop() {
            let kids = match seps.pop() {
                Some(sep) => vec![item, sep, tail],
                None => vec![item, tail],
            };
            tail = self.node(symbol, kids);
        }
        tail
    }

    /// Parse `list : item [',' list]`.
    fn parse_separated(
        &mut self,
        symbol: G,
        mut parse_item: impl FnMut(&mut Self) -> Result<NodeId>,
    ) -> Result<NodeId> {
        let mut items = vec![parse_item(self)?];
        let mut commas = Vec::new();
        while self.peek() == Some(G::TokComma) {
            commas.push(self.bump());
            items.push(parse_item(self)?);
        }
        Ok(self.right_nested(symbol, items, Some(commas)))
    }

    /// Wrap `items` as `opt_symbol : <empty> | list_symbol`.
    fn opt_list(&mut self, opt_symbol: G, list_symbol: G, items: Vec<NodeId>) -> NodeId {
        if items.is_empty() {
            self.node(opt_symbol, vec![])
        } else {
            let list = self.right_nested(list_symbol, items, None);
            self.node(opt_symbol, vec![list])
        }
    }

    // ========== Token access ==========

    fn peek(&self) -> Option<G> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<G> {
        let id = *self.tokens.get(self.pos + offset)?;
        match self.tree[id].tag() {
            Tag::Grammar(symbol) => Some(symbol),
            Tag::Ast(_) => None,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Consume the current token. Callers check that one exists.
    fn bump(&mut self) -> NodeId {
        let id = self.tokens[self.pos];
        self.pos += 1;
        id
    }

    fn expect(&mut self, symbol: G) -> Result<NodeId> {
        if self.peek() == Some(symbol) {
            Ok(self.bump())
        } else {
            Err(self.unexpected())
        }
    }

    fn unexpected(&self) -> Error {
        match self.tokens.get(self.pos) {
            Some(&id) => {
                let tok = &self.tree[id];
                Error::syntax(
                    tok.loc().clone(),
                    format!("syntax error, unexpected {}", tok.tag().name()),
                )
            }
            None => Error::syntax(
                self.eof_loc.clone(),
                "syntax error, unexpected end of file",
            ),
        }
    }

    /// An error at the current token, or at end of file.
    fn error_here(&self, desc: &str) -> Error {
        let loc = match self.tokens.get(self.pos) {
            Some(&id) => self.tree[id].loc().clone(),
            None => self.eof_loc.clone(),
        };
        Error::syntax(loc, desc)
    }
}

fn starts_type(symbol: G) -> bool {
    matches!(symbol, G::TokStruct | G::TokUnion) || BASIC_TYPE_KEYWORDS.contains(&symbol)
}
