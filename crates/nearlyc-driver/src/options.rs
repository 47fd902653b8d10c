//! Driver configuration.
//! 驱动配置。

use std::fmt;
use std::str::FromStr;

use nearlyc_common::{AnyArena, BasicArena, ChunkedArena, DEFAULT_INITIAL_SIZE};
use nearlyc_diagnostic::{Error, Result, runtime_error};

/// Environment variable selecting the arena implementation.
pub const ARENA_VAR: &str = "NEARLYC_ARENA";
/// Environment variable setting the initial chunk size in bytes.
pub const CHUNK_SIZE_VAR: &str = "NEARLYC_CHUNK_SIZE";

/// Which arena backs the tree.
/// 树使用哪种 Arena。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArenaChoice {
    /// One global allocation per node.
    Basic,
    /// Bump allocation out of growing chunks.
    #[default]
    Chunked,
}

impl FromStr for ArenaChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ArenaChoice::Basic),
            "chunked" => Ok(ArenaChoice::Chunked),
            _ => Err(format!("unknown arena '{s}' (expected 'basic' or 'chunked')")),
        }
    }
}

impl fmt::Display for ArenaChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaChoice::Basic => write!(f, "basic"),
            ArenaChoice::Chunked => write!(f, "chunked"),
        }
    }
}

/// What the driver does with the input.
/// 驱动对输入执行的操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print each token.
    PrintTokens,
    /// Print the parse tree.
    PrintParseTree,
    /// Print the AST.
    PrintAst,
    /// Print the AST as a Graphviz digraph.
    PrintGraph,
    /// Parse, build the AST and run semantic analysis.
    #[default]
    Compile,
}

/// Driver options.
/// 驱动选项。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub arena: ArenaChoice,
    /// Size of the first chunk of a chunked arena.
    pub initial_chunk_size: usize,
    pub mode: Mode,
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            arena: ArenaChoice::default(),
            initial_chunk_size: DEFAULT_INITIAL_SIZE,
            mode: Mode::default(),
            verbose: false,
        }
    }
}

impl Options {
    /// Defaults overlaid with `NEARLYC_ARENA` and `NEARLYC_CHUNK_SIZE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with the variables `lookup` returns.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut options = Options::default();
        if let Some(value) = lookup(ARENA_VAR) {
            options.arena = match value.parse() {
                Ok(arena) => arena,
                Err(msg) => return runtime_error!("{ARENA_VAR}: {msg}"),
            };
        }
        if let Some(value) = lookup(CHUNK_SIZE_VAR) {
            options.initial_chunk_size = parse_chunk_size(&value)
                .map_err(|msg| Error::runtime(format!("{CHUNK_SIZE_VAR}: {msg}")))?;
        }
        Ok(options)
    }

    pub fn with_arena(mut self, arena: ArenaChoice) -> Self {
        self.arena = arena;
        self
    }

    pub fn with_initial_chunk_size(mut self, size: usize) -> Self {
        self.initial_chunk_size = size;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Create the arena these options select.
    pub fn make_arena(&self) -> AnyArena {
        match self.arena {
            ArenaChoice::Basic => BasicArena::new().into(),
            ArenaChoice::Chunked => ChunkedArena::with_initial_size(self.initial_chunk_size).into(),
        }
    }
}

/// Parse a positive chunk size in bytes.
pub fn parse_chunk_size(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("chunk size must be positive".to_string()),
        Ok(size) => Ok(size),
        Err(_) => Err(format!("invalid chunk size '{s}'")),
    }
}
