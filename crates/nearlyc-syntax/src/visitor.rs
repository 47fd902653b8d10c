//! AST visitor.
//! AST 访问器。
//!
//! [`AstVisitor`] has one `visit_*` method per AST tag. Each defaults to
//! visiting the node's children, so an implementation overrides only the
//! node kinds it cares about. Later phases (semantic analysis, code
//! generation) are built on this trait.

use nearlyc_common::ensure_sufficient_stack;
use nearlyc_diagnostic::{Result, runtime_error};

use crate::{AstTag, NodeId, Tag, Tree};

macro_rules! ast_visitor {
    ($($tag:ident => $method:ident,)*) => {
        /// Base trait for AST visitors.
        pub trait AstVisitor {
            /// Visit a node, dispatching on its tag. Tokens go to
            /// [`AstVisitor::visit_token`]; a grammar nonterminal is an
            /// error, since it should not survive AST construction.
            fn visit(&mut self, tree: &Tree, n: NodeId) -> Result<()> {
                match tree[n].tag() {
                    Tag::Grammar(sym) if sym.is_token() => self.visit_token(tree, n),
                    $(Tag::Ast(AstTag::$tag) => self.$method(tree, n),)*
                    tag => runtime_error!("Unknown AST node tag {}", tag.value()),
                }
            }

            $(
                #[doc = concat!("Visit a node tagged `AstTag::", stringify!($tag), "`.")]
                fn $method(&mut self, tree: &Tree, n: NodeId) -> Result<()> {
                    self.visit_children(tree, n)
                }
            )*

            /// Call [`AstVisitor::visit`] on each child of `n`.
            fn visit_children(&mut self, tree: &Tree, n: NodeId) -> Result<()> {
                for kid in tree.children(n) {
                    ensure_sufficient_stack(|| self.visit(tree, kid))?;
                }
                Ok(())
            }

            /// Called for token (terminal symbol) nodes. Does nothing by default.
            fn visit_token(&mut self, _tree: &Tree, _n: NodeId) -> Result<()> {
                Ok(())
            }
        }
    };
}

ast_visitor! {
    Unit => visit_unit,
    VariableDeclaration => visit_variable_declaration,
    StructType => visit_struct_type,
    UnionType => visit_union_type,
    BasicType => visit_basic_type,
    DeclaratorList => visit_declarator_list,
    NamedDeclarator => visit_named_declarator,
    FunctionDefinition => visit_function_definition,
    FunctionDeclaration => visit_function_declaration,
    FunctionParameterList => visit_function_parameter_list,
    FunctionParameter => visit_function_parameter,
    StatementList => visit_statement_list,
    EmptyStatement => visit_empty_statement,
    ExpressionStatement => visit_expression_statement,
    ReturnStatement => visit_return_statement,
    ReturnExpressionStatement => visit_return_expression_statement,
    WhileStatement => visit_while_statement,
    DoWhileStatement => visit_do_while_statement,
    ForStatement => visit_for_statement,
    IfStatement => visit_if_statement,
    IfElseStatement => visit_if_else_statement,
    StructTypeDefinition => visit_struct_type_definition,
    UnionTypeDefinition => visit_union_type_definition,
    FieldDefinitionList => visit_field_definition_list,
    BinaryExpression => visit_binary_expression,
    UnaryExpression => visit_unary_expression,
    FunctionCallExpression => visit_function_call_expression,
    ArgumentExpressionList => visit_argument_expression_list,
    ArrayElementRefExpression => visit_array_element_ref_expression,
    FieldRefExpression => visit_field_ref_expression,
    IndirectFieldRefExpression => visit_indirect_field_ref_expression,
    VariableRef => visit_variable_ref,
    LiteralValue => visit_literal_value,
}
