//! Raw token definitions.
//! 原始 token 定义。

use logos::Logos;
use nearlyc_syntax::GrammarSymbol;

/// Token recognised by the logos-generated scanner.
/// Whitespace and comments are skipped.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+|//[^\n]*|/\*([^*]|\*+[^*/])*\*+/")]
pub(crate) enum RawToken {
    // Literals
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"(0[xX][0-9a-fA-F]+|[0-9]+)[uUlL]*")]
    IntLit,
    #[regex(r"([0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFlL]?")]
    FpLit,
    #[regex(r"'([^'\\\n]|\\.)'")]
    CharLit,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StrLit,

    // Keywords
    #[token("struct")]
    Struct,
    #[token("union")]
    Union,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("return")]
    Return,
    #[token("static")]
    Static,
    #[token("extern")]
    Extern,
    #[token("const")]
    Const,
    #[token("volatile")]
    Volatile,
    #[token("signed")]
    Signed,
    #[token("unsigned")]
    Unsigned,
    #[token("void")]
    Void,
    #[token("char")]
    Char,
    #[token("short")]
    Short,
    #[token("int")]
    Int,
    #[token("long")]
    Long,
    #[token("float")]
    Float,
    #[token("double")]
    Double,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,

    // Operators
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Divide,
    #[token("%")]
    Mod,
    #[token("!")]
    LogicalNot,
    #[token("&")]
    Ampersand,
    #[token("&&")]
    LogicalAnd,
    #[token("||")]
    LogicalOr,
    #[token("==")]
    Equality,
    #[token("!=")]
    Inequality,
    #[token("<")]
    Lt,
    #[token("<=")]
    Lte,
    #[token(">")]
    Gt,
    #[token(">=")]
    Gte,
}

impl RawToken {
    /// The grammar symbol used as the tag of this token's node.
    pub(crate) fn symbol(self) -> GrammarSymbol {
        use GrammarSymbol as G;
        match self {
            RawToken::Ident => G::TokIdent,
            RawToken::IntLit => G::TokIntLit,
            RawToken::FpLit => G::TokFpLit,
            RawToken::CharLit => G::TokCharLit,
            RawToken::StrLit => G::TokStrLit,
            RawToken::Struct => G::TokStruct,
            RawToken::Union => G::TokUnion,
            RawToken::If => G::TokIf,
            RawToken::Else => G::TokElse,
            RawToken::While => G::TokWhile,
            RawToken::Do => G::TokDo,
            RawToken::For => G::TokFor,
            RawToken::Return => G::TokReturn,
            RawToken::Static => G::TokStatic,
            RawToken::Extern => G::TokExtern,
            RawToken::Const => G::TokConst,
            RawToken::Volatile => G::TokVolatile,
            RawToken::Signed => G::TokSigned,
            RawToken::Unsigned => G::TokUnsigned,
            RawToken::Void => G::TokVoid,
            RawToken::Char => G::TokChar,
            RawToken::Short => G::TokShort,
            RawToken::Int => G::TokInt,
            RawToken::Long => G::TokLong,
            RawToken::Float => G::TokFloat,
            RawToken::Double => G::TokDouble,
            RawToken::LParen => G::TokLparen,
            RawToken::RParen => G::TokRparen,
            RawToken::LBrace => G::TokLbrace,
            RawToken::RBrace => G::TokRbrace,
            RawToken::LBracket => G::TokLbracket,
            RawToken::RBracket => G::TokRbracket,
            RawToken::Semicolon => G::TokSemicolon,
            RawToken::Comma => G::TokComma,
            RawToken::Dot => G::TokDot,
            RawToken::Arrow => G::TokArrow,
            RawToken::Assign => G::TokAssign,
            RawToken::Plus => G::TokPlus,
            RawToken::Minus => G::TokMinus,
            RawToken::Asterisk => G::TokAsterisk,
            RawToken::Divide => G::TokDivide,
            RawToken::Mod => G::TokMod,
            RawToken::LogicalNot => G::TokLogicalNot,
            RawToken::Ampersand => G::TokAmpersand,
            RawToken::LogicalAnd => G::TokLogicalAnd,
            RawToken::LogicalOr => G::TokLogicalOr,
            RawToken::Equality => G::TokEquality,
            RawToken::Inequality => G::TokInequality,
            RawToken::Lt => G::TokLt,
            RawToken::Lte => G::TokLte,
            RawToken::Gt => G::TokGt,
            RawToken::Gte => G::TokGte,
        }
    }
}

/// Character code of a character literal such as `'a'` or `'\n'`.
/// Returns `None` for an unknown escape sequence.
pub(crate) fn char_literal_value(text: &str) -> Option<i64> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let value = match chars.next()? {
        '\\' => match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            _ => return None,
        },
        c => c,
    };
    Some(i64::from(u32::from(value)))
}
