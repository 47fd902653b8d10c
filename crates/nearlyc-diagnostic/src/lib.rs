//! Error taxonomy and diagnostic reporting for nearlyc.
//! nearlyc 的错误分类和诊断报告。
//!
//! Every phase reports failure with an [`Error`]; the first error aborts
//! the translation unit. This crate also renders source snippets for
//! errors using ariadne.
//! 本 crate 使用 ariadne 库为错误渲染源码片段。

mod error;

pub use error::{Error, ErrorKind, Result};

use ariadne::{Color, Label, Report, ReportKind, Source};
use nearlyc_common::Location;

/// Character offset of `loc` within `source`, clamped to the text.
fn char_offset(source: &str, loc: &Location) -> usize {
    let line = usize::try_from(loc.line()).unwrap_or(1).max(1);
    let col = usize::try_from(loc.col()).unwrap_or(1).max(1);

    let mut offset = 0;
    for text in source.split('\n').take(line - 1) {
        offset += text.chars().count() + 1;
    }
    (offset + col - 1).min(source.chars().count())
}

/// Render an error with a source snippet to stderr.
/// 将带有源码片段的错误渲染到标准错误输出。
pub fn emit(source: &str, err: &Error) -> std::io::Result<()> {
    let loc = err.loc();
    let filename = loc.srcfile();
    let offset = if loc.is_valid() {
        char_offset(source, loc)
    } else {
        0
    };

    let mut report = Report::build(ReportKind::Error, filename, offset)
        .with_message(err.desc());

    if loc.is_valid() {
        let end = (offset + 1).min(source.chars().count()).max(offset);
        report = report.with_label(
            Label::new((filename, offset..end))
                .with_message(err.kind().as_str())
                .with_color(Color::Red),
        );
    }

    report
        .finish()
        .eprint((filename, Source::from(source)))
}
