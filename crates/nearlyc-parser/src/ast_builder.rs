//! Parse tree to AST rewriting.
//! 语法树到 AST 的改写。

use nearlyc_common::ensure_sufficient_stack;
use nearlyc_syntax::{AstTag, GrammarSymbol as G, Node, NodeId, Tag, Tree};

/// Rewrites a parse tree into an AST inside the same [`Tree`].
/// 在同一棵 [`Tree`] 中将语法树改写为 AST。
///
/// Token nodes are shared between the two trees rather than copied.
/// Parse tree nodes dropped by the rewrite stay allocated until the tree
/// is dropped.
pub struct AstBuilder<'t> {
    tree: &'t mut Tree,
}

impl<'t> AstBuilder<'t> {
    pub fn new(tree: &'t mut Tree) -> Self {
        Self { tree }
    }

    /// Build the AST for the parse tree rooted at `t`.
    ///
    /// Nodes whose tag has no rewrite rule are returned unchanged.
    ///
    /// # Panics
    /// Panics on a declarator other than a bare identifier.
    pub fn build_ast(&mut self, t: NodeId) -> NodeId {
        ensure_sufficient_stack(|| self.build_ast_inner(t))
    }

    fn build_ast_inner(&mut self, t: NodeId) -> NodeId {
        let symbol = match self.tree[t].tag() {
            Tag::Grammar(symbol) => symbol,
            Tag::Ast(_) => return t,
        };

        match symbol {
            G::NodeUnit => self.flatten(t, AstTag::Unit),

            G::NodeTopLevelDeclaration => {
                if self.num_kids(t) == 1 {
                    return self.build_kid(t, 0);
                }
                // The storage class keyword becomes the first child of
                // the declaration it qualifies.
                let storage = self.kid(t, 0);
                let decl = self.build_kid(t, 1);
                self.tree.prepend_kid(decl, storage);
                decl
            }

            G::NodeFunctionOrVariableDeclarationOrDefinition
            | G::NodeBasicTypeKeyword
            | G::NodeLogicalOrExpression
            | G::NodeLogicalAndExpression
            | G::NodeEqualityExpression
            | G::NodeRelationalExpression
            | G::NodeAdditiveExpression
            | G::NodeMultiplicativeExpression
            | G::NodeAssignmentExpression
                if self.num_kids(t) == 1 =>
            {
                self.build_kid(t, 0)
            }

            G::NodeLogicalOrExpression
            | G::NodeLogicalAndExpression
            | G::NodeEqualityExpression
            | G::NodeRelationalExpression
            | G::NodeAdditiveExpression
            | G::NodeMultiplicativeExpression
            | G::NodeAssignmentExpression => {
                let op = self.kid(t, 1);
                let lhs = self.build_kid(t, 0);
                let rhs = self.build_kid(t, 2);
                self.ast(AstTag::BinaryExpression, [op, lhs, rhs])
            }

            G::NodeSimpleVariableDeclaration => {
                let ty = self.build_kid(t, 0);
                let declarators = self.build_kid(t, 1);
                self.ast(AstTag::VariableDeclaration, [ty, declarators])
            }

            G::NodeDeclaratorList => self.flatten(t, AstTag::DeclaratorList),

            G::NodeDeclarator => {
                let np = self.kid(t, 0);
                let node = &self.tree[np];
                if node.tag() != G::NodeNonPointerDeclarator || node.num_kids() != 1 {
                    panic!("unsupported declarator");
                }
                let ident = node.kid(0);
                self.ast(AstTag::NamedDeclarator, [ident])
            }

            G::NodeFunctionDefinitionOrDeclaration => {
                let ty = self.build_kid(t, 0);
                let name = self.kid(t, 1);
                let params = self.build_kid(t, 3);
                let tail = self.kid(t, 5);
                if self.tree[tail].tag() == G::NodeCompoundStatement {
                    let body = self.build_ast(tail);
                    self.ast(AstTag::FunctionDefinition, [ty, name, params, body])
                } else {
                    self.ast(AstTag::FunctionDeclaration, [ty, name, params])
                }
            }

            G::NodeOptParameterList => self.build_opt(t, AstTag::FunctionParameterList),
            G::NodeParameterList => self.flatten(t, AstTag::FunctionParameterList),

            G::NodeParameter => {
                let ty = self.build_kid(t, 0);
                let declarator = self.build_kid(t, 1);
                self.ast(AstTag::FunctionParameter, [ty, declarator])
            }

            G::NodeType => {
                let first = self.kid(t, 0);
                match self.tree[first].tag() {
                    tag if tag == G::TokStruct => {
                        let name = self.kid(t, 1);
                        self.ast(AstTag::StructType, [name])
                    }
                    tag if tag == G::TokUnion => {
                        let name = self.kid(t, 1);
                        self.ast(AstTag::UnionType, [name])
                    }
                    _ => self.build_ast(first),
                }
            }

            G::NodeBasicType => self.flatten(t, AstTag::BasicType),

            G::NodeStructTypeDefinition => {
                let tag = if self.tree[self.kid(t, 0)].tag() == G::TokUnion {
                    AstTag::UnionTypeDefinition
                } else {
                    AstTag::StructTypeDefinition
                };
                let name = self.kid(t, 1);
                let fields = self.build_kid(t, 3);
                self.ast(tag, [name, fields])
            }

            G::NodeOptFieldDefinitionList => self.build_opt(t, AstTag::FieldDefinitionList),
            G::NodeFieldDefinitionList => self.flatten(t, AstTag::FieldDefinitionList),

            G::NodeCompoundStatement => self.build_kid(t, 1),
            G::NodeOptStatementList => self.build_opt(t, AstTag::StatementList),
            G::NodeStatementList => self.flatten(t, AstTag::StatementList),
            G::NodeStatement => self.build_statement(t),

            G::NodeUnaryExpression => {
                if self.num_kids(t) == 1 {
                    return self.build_kid(t, 0);
                }
                let op = self.kid(t, 0);
                let operand = self.build_kid(t, 1);
                self.ast(AstTag::UnaryExpression, [op, operand])
            }

            G::NodePostfixExpression => self.build_postfix(t),

            G::NodeOptArgumentExpressionList => {
                self.build_opt(t, AstTag::ArgumentExpressionList)
            }
            G::NodeArgumentExpressionList => self.flatten(t, AstTag::ArgumentExpressionList),

            G::NodePrimaryExpression => {
                if self.num_kids(t) == 3 {
                    // ( expression )
                    return self.build_kid(t, 1);
                }
                let tok = self.kid(t, 0);
                if self.tree[tok].tag() == G::TokIdent {
                    self.ast(AstTag::VariableRef, [tok])
                } else {
                    self.ast(AstTag::LiteralValue, [tok])
                }
            }

            _ => t,
        }
    }

    fn build_statement(&mut self, t: NodeId) -> NodeId {
        let first = self.kid(t, 0);
        let keyword_loc = self.tree[first].loc().clone();
        let Tag::Grammar(symbol) = self.tree[first].tag() else {
            return t;
        };

        let stmt = match symbol {
            G::TokSemicolon => self.ast(AstTag::EmptyStatement, []),
            G::TokReturn if self.num_kids(t) == 2 => self.ast(AstTag::ReturnStatement, []),
            G::TokReturn => {
                let value = self.build_kid(t, 1);
                self.ast(AstTag::ReturnExpressionStatement, [value])
            }
            G::TokWhile => {
                let cond = self.build_kid(t, 2);
                let body = self.build_kid(t, 4);
                self.ast(AstTag::WhileStatement, [cond, body])
            }
            G::TokDo => {
                let body = self.build_kid(t, 1);
                let cond = self.build_kid(t, 4);
                self.ast(AstTag::DoWhileStatement, [body, cond])
            }
            G::TokFor => {
                let init = self.build_kid(t, 2);
                let cond = self.build_kid(t, 4);
                let step = self.build_kid(t, 6);
                let body = self.build_kid(t, 8);
                self.ast(AstTag::ForStatement, [init, cond, step, body])
            }
            G::TokIf if self.num_kids(t) == 5 => {
                let cond = self.build_kid(t, 2);
                let then = self.build_kid(t, 4);
                self.ast(AstTag::IfStatement, [cond, then])
            }
            G::TokIf => {
                let cond = self.build_kid(t, 2);
                let then = self.build_kid(t, 4);
                let otherwise = self.build_kid(t, 6);
                self.ast(AstTag::IfElseStatement, [cond, then, otherwise])
            }
            G::NodeCompoundStatement | G::NodeSimpleVariableDeclaration => {
                return self.build_ast(first);
            }
            _ => {
                let expr = self.build_ast(first);
                return self.ast(AstTag::ExpressionStatement, [expr]);
            }
        };
        self.tree[stmt].set_loc(keyword_loc);
        stmt
    }

    fn build_postfix(&mut self, t: NodeId) -> NodeId {
        if self.num_kids(t) == 1 {
            return self.build_kid(t, 0);
        }
        let base = self.build_kid(t, 0);
        let op = self.tree[self.kid(t, 1)].tag();
        if op == G::TokLbracket {
            let index = self.build_kid(t, 2);
            self.ast(AstTag::ArrayElementRefExpression, [base, index])
        } else if op == G::TokLparen {
            let args = self.build_kid(t, 2);
            self.ast(AstTag::FunctionCallExpression, [base, args])
        } else if op == G::TokDot {
            let field = self.kid(t, 2);
            self.ast(AstTag::FieldRefExpression, [base, field])
        } else {
            let field = self.kid(t, 2);
            self.ast(AstTag::IndirectFieldRefExpression, [base, field])
        }
    }

    /// Collect the elements of the right-recursive list rooted at `t` into
    /// a single `tag` node, preserving their order.
    fn flatten(&mut self, t: NodeId, tag: AstTag) -> NodeId {
        let list = self.tree.alloc(Node::new(tag));
        let mut cur = t;
        loop {
            let element = self.build_kid(cur, 0);
            self.tree.append_kid(list, element);
            if self.num_kids(cur) == 1 {
                break;
            }
            cur = self.tree[cur].last_kid();
        }
        list
    }

    /// `opt_x : <empty> | x`, where the empty case is an empty `tag` node.
    fn build_opt(&mut self, t: NodeId, tag: AstTag) -> NodeId {
        if self.num_kids(t) == 0 {
            self.tree.alloc(Node::new(tag))
        } else {
            self.build_kid(t, 0)
        }
    }

    fn ast<const N: usize>(&mut self, tag: AstTag, kids: [NodeId; N]) -> NodeId {
        self.tree.alloc_with_kids(tag, kids)
    }

    fn kid(&self, t: NodeId, index: usize) -> NodeId {
        self.tree.kid(t, index)
    }

    fn num_kids(&self, t: NodeId) -> usize {
        self.tree[t].num_kids()
    }

    fn build_kid(&mut self, t: NodeId, index: usize) -> NodeId {
        let kid = self.kid(t, index);
        self.build_ast(kid)
    }
}
