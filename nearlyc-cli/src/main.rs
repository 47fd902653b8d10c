//! nearly_c - the nearly-C compiler command line interface.
//! nearly_c - nearly-C 编译器的命令行界面。

mod output;

use clap::{ArgGroup, Parser};
use nearlyc_diagnostic::Result;
use nearlyc_driver::{ArenaChoice, Context, Mode, Options, init_tracing, parse_chunk_size};
use nearlyc_fmt::{AstTreePrint, ParseTreePrint, PrintGraph, TreePrint};

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "nearly_c")]
#[command(version, about = "Compiler front end for nearly-C", long_about = None)]
#[command(group(ArgGroup::new("mode").args(["tokens", "parse_tree", "ast", "graph", "compile"])))]
struct Cli {
    /// Print tokens. / 打印 token。
    #[arg(short = 'l', long)]
    tokens: bool,

    /// Print the parse tree. / 打印语法树。
    #[arg(short = 'p', long)]
    parse_tree: bool,

    /// Print the AST. / 打印 AST。
    #[arg(short = 'a', long)]
    ast: bool,

    /// Print the AST as a Graphviz digraph. / 以 Graphviz 格式打印 AST。
    #[arg(short = 'g', long)]
    graph: bool,

    /// Compile (the default). / 编译（默认）。
    #[arg(short = 'c', long)]
    compile: bool,

    /// Arena implementation (basic, chunked). / Arena 实现。
    #[arg(long)]
    arena: Option<ArenaChoice>,

    /// Initial chunk size in bytes. / 初始块大小（字节）。
    #[arg(long, value_parser = parse_chunk_size)]
    chunk_size: Option<usize>,

    /// Enable verbose output. / 启用详细输出。
    #[arg(short, long)]
    verbose: bool,

    /// Source file. / 源文件。
    file: String,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.tokens {
            Mode::PrintTokens
        } else if self.parse_tree {
            Mode::PrintParseTree
        } else if self.ast {
            Mode::PrintAst
        } else if self.graph {
            Mode::PrintGraph
        } else {
            Mode::Compile
        }
    }

    /// Environment options overlaid with command line flags.
    fn options(&self) -> Result<Options> {
        let mut options = Options::from_env()?
            .with_mode(self.mode())
            .with_verbose(self.verbose);
        if let Some(arena) = self.arena {
            options = options.with_arena(arena);
        }
        if let Some(size) = self.chunk_size {
            options = options.with_initial_chunk_size(size);
        }
        Ok(options)
    }
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();

    let result = cli.options().and_then(|options| {
        init_tracing(options.verbose);
        run(&cli.file, options)
    });

    if let Err(e) = result {
        output::error(&e, cli.verbose);
        std::process::exit(1);
    }
}

fn run(file: &str, options: Options) -> Result<()> {
    let mode = options.mode;
    let mut ctx = Context::new(options);

    match mode {
        Mode::PrintTokens => {
            let ids = ctx.scan_tokens(file)?;
            print!("{}", output::tokens(ctx.tree(), &ids));
        }
        Mode::PrintParseTree => {
            ctx.parse(file)?;
            if let Some(root) = ctx.parse_tree() {
                print!("{}", ParseTreePrint.print(ctx.tree(), root));
            }
        }
        Mode::PrintAst => {
            ctx.parse(file)?;
            let ast = ctx.build_ast()?;
            print!("{}", AstTreePrint.print(ctx.tree(), ast));
        }
        Mode::PrintGraph => {
            ctx.parse(file)?;
            let ast = ctx.build_ast()?;
            print!("{}", PrintGraph::new(ctx.tree(), ast).render());
        }
        Mode::Compile => {
            ctx.parse(file)?;
            ctx.compile()?;
        }
    }
    Ok(())
}
