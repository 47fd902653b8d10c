//! Source location tracking.
//! 源码位置跟踪。

use std::fmt;
use std::sync::Arc;

/// A position in a source file: file name, line and column.
/// 源文件中的位置：文件名、行号和列号。
///
/// Lines and columns are 1-based. A location whose line is not positive
/// is invalid; `Location::default()` is the invalid location `<unknown>`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Location {
    srcfile: Arc<str>,
    line: i32,
    col: i32,
}

impl Location {
    pub fn new(srcfile: impl Into<Arc<str>>, line: i32, col: i32) -> Self {
        Location {
            srcfile: srcfile.into(),
            line,
            col,
        }
    }

    /// Returns true if this location refers to an actual source position.
    /// 如果此位置指向实际的源码位置则返回 true。
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }

    pub fn srcfile(&self) -> &str {
        &self.srcfile
    }

    pub fn line(&self) -> i32 {
        self.line
    }

    pub fn col(&self) -> i32 {
        self.col
    }

    /// Move forward `num_cols` columns on the current line.
    /// 在当前行向前移动 `num_cols` 列。
    pub fn advance(&mut self, num_cols: i32) {
        self.col += num_cols;
    }

    /// Move to column 1 of the next line.
    /// 移动到下一行的第 1 列。
    pub fn next_line(&mut self) {
        self.line += 1;
        self.col = 1;
    }
}

impl Default for Location {
    fn default() -> Self {
        Location {
            srcfile: Arc::from("<unknown>"),
            line: -1,
            col: -1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.srcfile, self.line, self.col)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Location({self})")
        } else {
            write!(f, "Location(<invalid>)")
        }
    }
}
