//! Node tags.
//! 节点标签。
//!
//! Every tree node carries a [`Tag`]. Grammar symbols (tokens and
//! nonterminals) and AST node kinds live in disjoint numeric ranges, so a
//! tag value alone tells whether a node belongs to the parse tree or to the
//! AST:
//!
//! | Range | Meaning |
//! |---|---|
//! | `258..1000` | tokens (terminal symbols) |
//! | `1000..10000` | grammar nonterminals |
//! | `10000..` | AST node kinds |

use std::fmt;

/// First token value.
pub const TOKEN_BASE: u32 = 258;
/// First nonterminal value.
pub const NONTERMINAL_BASE: u32 = 1000;
/// First AST tag value.
pub const AST_TAG_BASE: u32 = 10000;

macro_rules! define_tags {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident $(= $value:literal)? => $text:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum $name {
            $($variant $(= $value)?,)*
        }

        impl $name {
            /// Every member, in numeric order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            /// The printable name of this tag.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }

            pub fn from_u32(value: u32) -> Option<$name> {
                Self::ALL.iter().copied().find(|tag| *tag as u32 == value)
            }
        }
    };
}

define_tags! {
    /// Terminal and nonterminal symbols of the grammar.
    /// 语法中的终结符和非终结符。
    GrammarSymbol {
        // Tokens
        TokIdent = 258 => "TOK_IDENT",
        TokIntLit => "TOK_INT_LIT",
        TokFpLit => "TOK_FP_LIT",
        TokCharLit => "TOK_CHAR_LIT",
        TokStrLit => "TOK_STR_LIT",
        TokStruct => "TOK_STRUCT",
        TokUnion => "TOK_UNION",
        TokIf => "TOK_IF",
        TokElse => "TOK_ELSE",
        TokWhile => "TOK_WHILE",
        TokDo => "TOK_DO",
        TokFor => "TOK_FOR",
        TokReturn => "TOK_RETURN",
        TokStatic => "TOK_STATIC",
        TokExtern => "TOK_EXTERN",
        TokConst => "TOK_CONST",
        TokVolatile => "TOK_VOLATILE",
        TokSigned => "TOK_SIGNED",
        TokUnsigned => "TOK_UNSIGNED",
        TokVoid => "TOK_VOID",
        TokChar => "TOK_CHAR",
        TokShort => "TOK_SHORT",
        TokInt => "TOK_INT",
        TokLong => "TOK_LONG",
        TokFloat => "TOK_FLOAT",
        TokDouble => "TOK_DOUBLE",
        TokLparen => "TOK_LPAREN",
        TokRparen => "TOK_RPAREN",
        TokLbrace => "TOK_LBRACE",
        TokRbrace => "TOK_RBRACE",
        TokLbracket => "TOK_LBRACKET",
        TokRbracket => "TOK_RBRACKET",
        TokSemicolon => "TOK_SEMICOLON",
        TokComma => "TOK_COMMA",
        TokDot => "TOK_DOT",
        TokArrow => "TOK_ARROW",
        TokAssign => "TOK_ASSIGN",
        TokPlus => "TOK_PLUS",
        TokMinus => "TOK_MINUS",
        TokAsterisk => "TOK_ASTERISK",
        TokDivide => "TOK_DIVIDE",
        TokMod => "TOK_MOD",
        TokLogicalNot => "TOK_LOGICAL_NOT",
        TokAmpersand => "TOK_AMPERSAND",
        TokLogicalAnd => "TOK_LOGICAL_AND",
        TokLogicalOr => "TOK_LOGICAL_OR",
        TokEquality => "TOK_EQUALITY",
        TokInequality => "TOK_INEQUALITY",
        TokLt => "TOK_LT",
        TokLte => "TOK_LTE",
        TokGt => "TOK_GT",
        TokGte => "TOK_GTE",

        // Nonterminals
        NodeUnit = 1000 => "unit",
        NodeTopLevelDeclaration => "top_level_declaration",
        NodeFunctionOrVariableDeclarationOrDefinition
            => "function_or_variable_declaration_or_definition",
        NodeSimpleVariableDeclaration => "simple_variable_declaration",
        NodeDeclaratorList => "declarator_list",
        NodeDeclarator => "declarator",
        NodeNonPointerDeclarator => "non_pointer_declarator",
        NodeFunctionDefinitionOrDeclaration => "function_definition_or_declaration",
        NodeOptParameterList => "opt_parameter_list",
        NodeParameterList => "parameter_list",
        NodeParameter => "parameter",
        NodeType => "type",
        NodeBasicType => "basic_type",
        NodeBasicTypeKeyword => "basic_type_keyword",
        NodeStructTypeDefinition => "struct_type_definition",
        NodeOptFieldDefinitionList => "opt_field_definition_list",
        NodeFieldDefinitionList => "field_definition_list",
        NodeCompoundStatement => "compound_statement",
        NodeOptStatementList => "opt_statement_list",
        NodeStatementList => "statement_list",
        NodeStatement => "statement",
        NodeAssignmentExpression => "assignment_expression",
        NodeLogicalOrExpression => "logical_or_expression",
        NodeLogicalAndExpression => "logical_and_expression",
        NodeEqualityExpression => "equality_expression",
        NodeRelationalExpression => "relational_expression",
        NodeAdditiveExpression => "additive_expression",
        NodeMultiplicativeExpression => "multiplicative_expression",
        NodeUnaryExpression => "unary_expression",
        NodePostfixExpression => "postfix_expression",
        NodeOptArgumentExpressionList => "opt_argument_expression_list",
        NodeArgumentExpressionList => "argument_expression_list",
        NodePrimaryExpression => "primary_expression",
    }
}

impl GrammarSymbol {
    /// True for terminal symbols.
    pub fn is_token(self) -> bool {
        (self as u32) < NONTERMINAL_BASE
    }
}

define_tags! {
    /// Kinds of AST nodes.
    /// AST 节点的种类。
    AstTag {
        Unit = 10000 => "AST_UNIT",
        VariableDeclaration => "AST_VARIABLE_DECLARATION",
        StructType => "AST_STRUCT_TYPE",
        UnionType => "AST_UNION_TYPE",
        BasicType => "AST_BASIC_TYPE",
        DeclaratorList => "AST_DECLARATOR_LIST",
        NamedDeclarator => "AST_NAMED_DECLARATOR",
        FunctionDefinition => "AST_FUNCTION_DEFINITION",
        FunctionDeclaration => "AST_FUNCTION_DECLARATION",
        FunctionParameterList => "AST_FUNCTION_PARAMETER_LIST",
        FunctionParameter => "AST_FUNCTION_PARAMETER",
        StatementList => "AST_STATEMENT_LIST",
        EmptyStatement => "AST_EMPTY_STATEMENT",
        ExpressionStatement => "AST_EXPRESSION_STATEMENT",
        ReturnStatement => "AST_RETURN_STATEMENT",
        ReturnExpressionStatement => "AST_RETURN_EXPRESSION_STATEMENT",
        WhileStatement => "AST_WHILE_STATEMENT",
        DoWhileStatement => "AST_DO_WHILE_STATEMENT",
        ForStatement => "AST_FOR_STATEMENT",
        IfStatement => "AST_IF_STATEMENT",
        IfElseStatement => "AST_IF_ELSE_STATEMENT",
        StructTypeDefinition => "AST_STRUCT_TYPE_DEFINITION",
        UnionTypeDefinition => "AST_UNION_TYPE_DEFINITION",
        FieldDefinitionList => "AST_FIELD_DEFINITION_LIST",
        BinaryExpression => "AST_BINARY_EXPRESSION",
        UnaryExpression => "AST_UNARY_EXPRESSION",
        FunctionCallExpression => "AST_FUNCTION_CALL_EXPRESSION",
        ArgumentExpressionList => "AST_ARGUMENT_EXPRESSION_LIST",
        ArrayElementRefExpression => "AST_ARRAY_ELEMENT_REF_EXPRESSION",
        FieldRefExpression => "AST_FIELD_REF_EXPRESSION",
        IndirectFieldRefExpression => "AST_INDIRECT_FIELD_REF_EXPRESSION",
        VariableRef => "AST_VARIABLE_REF",
        LiteralValue => "AST_LITERAL_VALUE",
    }
}

/// The tag of a tree node: either a grammar symbol or an AST node kind.
/// 树节点的标签：语法符号或 AST 节点种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Grammar(GrammarSymbol),
    Ast(AstTag),
}

impl Tag {
    /// Numeric tag value.
    pub fn value(self) -> u32 {
        match self {
            Tag::Grammar(sym) => sym as u32,
            Tag::Ast(tag) => tag as u32,
        }
    }

    /// Decode a numeric tag value, using the range to pick the enum.
    pub fn from_u32(value: u32) -> Option<Tag> {
        if value >= AST_TAG_BASE {
            AstTag::from_u32(value).map(Tag::Ast)
        } else {
            GrammarSymbol::from_u32(value).map(Tag::Grammar)
        }
    }

    pub fn is_ast(self) -> bool {
        matches!(self, Tag::Ast(_))
    }

    pub fn is_token(self) -> bool {
        matches!(self, Tag::Grammar(sym) if sym.is_token())
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Grammar(sym) => sym.name(),
            Tag::Ast(tag) => tag.name(),
        }
    }
}

impl From<GrammarSymbol> for Tag {
    fn from(sym: GrammarSymbol) -> Self {
        Tag::Grammar(sym)
    }
}

impl From<AstTag> for Tag {
    fn from(tag: AstTag) -> Self {
        Tag::Ast(tag)
    }
}

impl PartialEq<GrammarSymbol> for Tag {
    fn eq(&self, other: &GrammarSymbol) -> bool {
        *self == Tag::Grammar(*other)
    }
}

impl PartialEq<AstTag> for Tag {
    fn eq(&self, other: &AstTag) -> bool {
        *self == Tag::Ast(*other)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ranges_are_disjoint() {
        for sym in GrammarSymbol::ALL {
            let value = *sym as u32;
            assert!((TOKEN_BASE..AST_TAG_BASE).contains(&value));
            assert_eq!(sym.is_token(), value < NONTERMINAL_BASE);
        }
        for tag in AstTag::ALL {
            assert!(*tag as u32 >= AST_TAG_BASE);
        }
    }

    #[test]
    fn test_from_u32_round_trips_by_range() {
        assert_eq!(Tag::from_u32(258), Some(Tag::Grammar(GrammarSymbol::TokIdent)));
        assert_eq!(Tag::from_u32(1000), Some(Tag::Grammar(GrammarSymbol::NodeUnit)));
        assert_eq!(Tag::from_u32(10000), Some(Tag::Ast(AstTag::Unit)));
        assert_eq!(Tag::from_u32(10001), Some(Tag::Ast(AstTag::VariableDeclaration)));
        assert_eq!(Tag::from_u32(5), None);
        assert_eq!(Tag::from_u32(999), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(Tag::from(GrammarSymbol::NodeUnit).name(), "unit");
        assert_eq!(Tag::from(GrammarSymbol::TokSemicolon).to_string(), "TOK_SEMICOLON");
        assert_eq!(Tag::from(AstTag::IfElseStatement).name(), "AST_IF_ELSE_STATEMENT");
        assert!(Tag::from(GrammarSymbol::TokIdent) == GrammarSymbol::TokIdent);
        assert!(Tag::from(AstTag::Unit) != GrammarSymbol::NodeUnit);
    }
}
