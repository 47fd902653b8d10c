//! Compiler error values.
//! 编译器错误值。

use nearlyc_common::{Location, ValueError};
use thiserror::Error;

/// Category of a compiler error.
/// 编译器错误的类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operational failure unrelated to source text (e.g. unreadable input).
    Runtime,
    /// The scanner or parser rejected the input.
    Syntax,
    /// Reserved for the semantic analysis phase.
    Semantic,
    /// Reserved for the constant evaluation phase.
    Evaluation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Runtime => "runtime error",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Semantic => "semantic error",
            ErrorKind::Evaluation => "evaluation error",
        }
    }
}

/// An error that aborts compilation of the current translation unit.
/// 中止当前翻译单元编译的错误。
///
/// Source-positioned errors carry the location they were raised at;
/// runtime errors carry the invalid location.
#[derive(Debug, Clone, Error)]
#[error("{desc}")]
pub struct Error {
    kind: ErrorKind,
    loc: Location,
    desc: String,
}

impl Error {
    pub fn runtime(desc: impl Into<String>) -> Self {
        Error {
            kind: ErrorKind::Runtime,
            loc: Location::default(),
            desc: desc.into(),
        }
    }

    pub fn syntax(loc: Location, desc: impl Into<String>) -> Self {
        Self::located(ErrorKind::Syntax, loc, desc)
    }

    pub fn semantic(loc: Location, desc: impl Into<String>) -> Self {
        Self::located(ErrorKind::Semantic, loc, desc)
    }

    pub fn evaluation(loc: Location, desc: impl Into<String>) -> Self {
        Self::located(ErrorKind::Evaluation, loc, desc)
    }

    fn located(kind: ErrorKind, loc: Location, desc: impl Into<String>) -> Self {
        Error {
            kind,
            loc,
            desc: desc.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn loc(&self) -> &Location {
        &self.loc
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Render the error as the single line the driver prints:
    /// `line:col: message` when the location is valid, else `message`.
    pub fn to_diagnostic_line(&self) -> String {
        if self.loc.is_valid() {
            format!("{}:{}: {}", self.loc.line(), self.loc.col(), self.desc)
        } else {
            self.desc.clone()
        }
    }
}

impl From<ValueError> for Error {
    fn from(err: ValueError) -> Self {
        Error::runtime(err.to_string())
    }
}

/// Result type used throughout the compiler.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return early with a runtime error built from format arguments.
#[macro_export]
macro_rules! runtime_error {
    ($($arg:tt)*) => {
        ::std::result::Result::Err($crate::Error::runtime(format!($($arg)*)))
    };
}

/// Evaluate to `Err` holding a syntax error at `loc`.
#[macro_export]
macro_rules! syntax_error {
    ($loc:expr, $($arg:tt)*) => {
        ::std::result::Result::Err($crate::Error::syntax($loc, format!($($arg)*)))
    };
}

/// Evaluate to `Err` holding a semantic error at `loc`.
#[macro_export]
macro_rules! semantic_error {
    ($loc:expr, $($arg:tt)*) => {
        ::std::result::Result::Err($crate::Error::semantic($loc, format!($($arg)*)))
    };
}

/// Evaluate to `Err` holding an evaluation error at `loc`.
#[macro_export]
macro_rules! evaluation_error {
    ($loc:expr, $($arg:tt)*) => {
        ::std::result::Result::Err($crate::Error::evaluation($loc, format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(name: &str) -> Result<()> {
        runtime_error!("Couldn't open '{}'", name)
    }

    fn reject(loc: Location) -> Result<u32> {
        syntax_error!(loc, "syntax error, unexpected {}", "TOK_SEMICOLON")
    }

    #[test]
    fn test_runtime_error_has_no_location() {
        let err = open("missing.c").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Runtime);
        assert!(!err.loc().is_valid());
        assert_eq!(err.to_diagnostic_line(), "Couldn't open 'missing.c'");
    }

    #[test]
    fn test_syntax_error_line() {
        let err = reject(Location::new("t.c", 5, 10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.loc().line(), 5);
        assert_eq!(err.loc().col(), 10);
        assert_eq!(
            err.to_diagnostic_line(),
            "5:10: syntax error, unexpected TOK_SEMICOLON"
        );
        assert_eq!(err.to_string(), "syntax error, unexpected TOK_SEMICOLON");
    }

    #[test]
    fn test_reserved_kinds() {
        let loc = Location::new("t.c", 2, 3);
        let sem: Result<()> = semantic_error!(loc.clone(), "undefined variable '{}'", "x");
        let eval: Result<()> = evaluation_error!(loc, "division by zero");
        assert_eq!(sem.unwrap_err().kind(), ErrorKind::Semantic);
        let eval = eval.unwrap_err();
        assert_eq!(eval.kind(), ErrorKind::Evaluation);
        assert_eq!(eval.to_diagnostic_line(), "2:3: division by zero");
    }

    #[test]
    fn test_value_error_becomes_runtime() {
        let err: Error = ValueError::TooLarge("99".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Runtime);
        assert_eq!(err.desc(), "Value '99' is too large to represent");
    }
}
