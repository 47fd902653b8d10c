//! End-to-end tests: source file to AST through the driver.

use std::io::Write;

use nearlyc_diagnostic::ErrorKind;
use nearlyc_driver::{ArenaChoice, Context, Options};
use nearlyc_parser::MAX_NESTING_DEPTH;
use nearlyc_syntax::AstTag;
use tempfile::NamedTempFile;

fn source_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

fn path(file: &NamedTempFile) -> String {
    file.path().to_str().unwrap().to_string()
}

const PROGRAM: &str = "\
struct Node {
  int value;
  struct Node next;
};

static int count;

int sum(int n) {
  int total;
  total = 0;
  while (n > 0) {
    total = total + n;
    n = n - 1;
  }
  return total;
}
";

#[test]
fn test_minimal_unit() {
    let file = source_file("int main() { return 0; }\n");
    let mut ctx = Context::new(Options::default());
    ctx.parse(&path(&file)).unwrap();
    let ast = ctx.build_ast().unwrap();
    assert_eq!(ctx.tree()[ast].tag(), AstTag::Unit);
    assert_eq!(ctx.get_ast(), Some(ast));
}

#[test]
fn test_both_arenas_build_the_same_ast() {
    let file = source_file(PROGRAM);
    let mut dumps = Vec::new();
    for arena in [ArenaChoice::Basic, ArenaChoice::Chunked] {
        let options = Options::default()
            .with_arena(arena)
            .with_initial_chunk_size(256);
        let mut ctx = Context::new(options);
        ctx.parse(&path(&file)).unwrap();
        let ast = ctx.build_ast().unwrap();
        let tags: Vec<&str> = ctx
            .tree()
            .preorder(ast)
            .map(|id| ctx.tree()[id].tag().name())
            .collect();
        dumps.push(tags);
    }
    assert_eq!(dumps[0], dumps[1]);
    assert_eq!(dumps[0][0], "AST_UNIT");
}

#[test]
fn test_compile_counts_declarations() {
    let file = source_file(PROGRAM);
    let mut ctx = Context::new(Options::default());
    ctx.parse(&path(&file)).unwrap();
    let analysis = ctx.compile().unwrap();
    // Node, value, next, count, sum, total
    assert_eq!(analysis.declarations(), 6);
}

#[test]
fn test_syntax_error_reports_line_and_column() {
    let file = source_file("int a;\nint b;\nint c;\nint d;\nint abcde= 1;\n");
    let mut ctx = Context::new(Options::default());
    let err = ctx.parse(&path(&file)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!((err.loc().line(), err.loc().col()), (5, 10));
    assert_eq!(
        err.to_diagnostic_line(),
        "5:10: syntax error, unexpected TOK_ASSIGN"
    );
    assert!(ctx.get_ast().is_none());
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let source = format!("int f() {{\n  x = {}a;\n}}\n", "-".repeat(1000));
    let mut ctx = Context::new(Options::default());
    let err = ctx.parse_source(&source, "deep.c").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    // The statement, the assignment and its right-hand side use three
    // levels before the first minus sign at column 7.
    let col = 7 + (MAX_NESTING_DEPTH - 3) as i32;
    assert_eq!((err.loc().line(), err.loc().col()), (2, col));
    assert_eq!(
        err.to_diagnostic_line(),
        format!("2:{col}: syntax error, nesting too deep")
    );
    assert!(ctx.get_ast().is_none());
}

#[test]
fn test_unrecognized_character() {
    let file = source_file("int x;\nx = a # b;\n");
    let mut ctx = Context::new(Options::default());
    let err = ctx.parse(&path(&file)).unwrap_err();
    assert_eq!(err.to_diagnostic_line(), "2:7: Unrecognized character '#'");
}

#[test]
fn test_scan_tokens() {
    let file = source_file("a+1");
    let mut ctx = Context::new(Options::default());
    let ids = ctx.scan_tokens(&path(&file)).unwrap();
    let names: Vec<&str> = ids.iter().map(|&id| ctx.tree()[id].tag().name()).collect();
    assert_eq!(names, vec!["TOK_IDENT", "TOK_PLUS", "TOK_INT_LIT"]);
}

#[test]
fn test_missing_file_is_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.c");
    let missing = missing.to_str().unwrap();
    let mut ctx = Context::new(Options::default());
    let err = ctx.parse(missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert!(!err.loc().is_valid());
    assert_eq!(err.to_diagnostic_line(), format!("Couldn't open '{missing}'"));
}
