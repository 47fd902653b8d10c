//! Per-translation-unit compilation state.
//! 每个翻译单元的编译状态。

use std::fs;

use nearlyc_diagnostic::{Result, runtime_error};
use nearlyc_lexer::Lexer;
use nearlyc_syntax::{AstVisitor, NodeId, Tree};
use tracing::{debug, info, trace};

use crate::Options;

/// Owns the tree of one translation unit and runs the compiler phases
/// over it.
/// 拥有一个翻译单元的树，并在其上运行各编译阶段。
///
/// All nodes, tokens, parse tree and AST alike, live in one [`Tree`]
/// backed by the arena the [`Options`] select, and are released together
/// when the context is dropped.
pub struct Context {
    options: Options,
    tree: Tree,
    parse_tree: Option<NodeId>,
    ast: Option<NodeId>,
}

impl Context {
    pub fn new(options: Options) -> Self {
        let tree = Tree::with_arena(options.make_arena());
        Self {
            options,
            tree,
            parse_tree: None,
            ast: None,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Scan `filename` without parsing it and return its token nodes.
    pub fn scan_tokens(&mut self, filename: &str) -> Result<Vec<NodeId>> {
        let source = read_source(filename)?;
        let tokens = Lexer::new(&source, filename).tokenize(&mut self.tree)?;
        Ok(tokens.ids)
    }

    /// Parse `filename` and keep its parse tree.
    pub fn parse(&mut self, filename: &str) -> Result<()> {
        let source = read_source(filename)?;
        self.parse_source(&source, filename)
    }

    /// Parse in-memory `source`, reporting locations in `filename`.
    pub fn parse_source(&mut self, source: &str, filename: &str) -> Result<()> {
        let root = nearlyc_parser::parse(&mut self.tree, source, filename)?;
        debug!(root = %self.tree[root].tag(), "parsed {}", filename);
        self.parse_tree = Some(root);
        self.ast = None;
        Ok(())
    }

    /// Root of the parse tree, if a unit has been parsed.
    pub fn parse_tree(&self) -> Option<NodeId> {
        self.parse_tree
    }

    /// Rewrite the parse tree into an AST and keep it.
    pub fn build_ast(&mut self) -> Result<NodeId> {
        let Some(root) = self.parse_tree else {
            return runtime_error!("No parse tree to build an AST from");
        };
        let ast = nearlyc_parser::build_ast(&mut self.tree, root);
        let discarded = self.tree.detached_from(ast);
        debug!(
            nodes = self.tree.len(),
            discarded = discarded.len(),
            "parse tree nodes no longer reachable from the AST"
        );
        self.ast = Some(ast);
        Ok(ast)
    }

    /// The current root: the AST once built, else the parse tree.
    pub fn get_ast(&self) -> Option<NodeId> {
        self.ast.or(self.parse_tree)
    }

    /// Build the AST if needed and run semantic analysis over it.
    pub fn compile(&mut self) -> Result<SemanticAnalysis> {
        let ast = match self.ast {
            Some(ast) => ast,
            None => self.build_ast()?,
        };
        let mut analysis = SemanticAnalysis::default();
        analysis.visit(&self.tree, ast)?;
        info!(declarations = analysis.declarations(), "semantic analysis done");
        Ok(analysis)
    }
}

fn read_source(filename: &str) -> Result<String> {
    let bytes = match fs::read(filename) {
        Ok(bytes) => bytes,
        Err(err) => {
            trace!(%err, "read failed");
            return runtime_error!("Couldn't open '{}'", filename);
        }
    };
    match String::from_utf8(bytes) {
        Ok(source) => Ok(source),
        Err(err) => {
            let at = err.utf8_error().valid_up_to();
            runtime_error!("'{}' is not valid UTF-8 (byte offset {})", filename, at)
        }
    }
}

/// Semantic analysis pass. For now it only counts top-level and local
/// declarations.
#[derive(Debug, Default)]
pub struct SemanticAnalysis {
    declarations: usize,
}

impl SemanticAnalysis {
    /// Variable, function and struct/union declarations seen.
    pub fn declarations(&self) -> usize {
        self.declarations
    }

    fn declare(&mut self, tree: &Tree, n: NodeId) -> Result<()> {
        self.declarations += 1;
        trace!(tag = %tree[n].tag(), loc = %tree[n].loc(), "declaration");
        self.visit_children(tree, n)
    }
}

impl AstVisitor for SemanticAnalysis {
    fn visit_variable_declaration(&mut self, tree: &Tree, n: NodeId) -> Result<()> {
        self.declare(tree, n)
    }

    fn visit_function_definition(&mut self, tree: &Tree, n: NodeId) -> Result<()> {
        self.declare(tree, n)
    }

    fn visit_function_declaration(&mut self, tree: &Tree, n: NodeId) -> Result<()> {
        self.declare(tree, n)
    }

    fn visit_struct_type_definition(&mut self, tree: &Tree, n: NodeId) -> Result<()> {
        self.declare(tree, n)
    }

    fn visit_union_type_definition(&mut self, tree: &Tree, n: NodeId) -> Result<()> {
        self.declare(tree, n)
    }
}
