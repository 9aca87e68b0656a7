//! toyc-drv - Compiler Driver
//!
//! Reads a resolved AST document (JSON) produced by the front end, then
//! either dumps the tree or lowers it to RISC-V assembly.

pub mod config;
pub mod error;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};

use toyc_ast::{destroy_tree, Node, TreePrinter};
use toyc_gen::{generate, GenContext, GenOptions};
use toyc_util::Diagnostic;

pub use config::Config;
pub use error::{DriverError, Result};

/// toyc - RISC-V backend for the toy language
#[derive(Parser, Debug)]
#[command(name = "toyc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lower a toy-language AST to RISC-V assembly", long_about = None)]
pub struct Cli {
    /// AST document (JSON) to compile
    pub input: PathBuf,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// What to produce
    #[arg(long, value_enum, default_value_t = EmitType::Asm)]
    pub emit: EmitType,

    /// Path to configuration file
    #[arg(short, long, env = "TOYC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, env = "TOYC_VERBOSE")]
    pub verbose: bool,

    /// Turn placeholders for malformed nodes into errors
    #[arg(long)]
    pub strict: bool,

    /// Disable color output
    #[arg(long, env = "TOYC_NO_COLOR")]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmitType {
    /// RISC-V assembly listing
    Asm,
    /// Indented tree dump
    Ast,
}

/// Settings for one invocation, after merging flags over the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub emit: EmitType,
    pub gen: GenOptions,
    pub indent: usize,
}

impl Options {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            emit: cli.emit,
            gen: GenOptions {
                label_base: config.codegen.label_base,
                strict: cli.strict || config.codegen.strict,
            },
            indent: config.printer.indent,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            emit: EmitType::Asm,
            gen: GenOptions::default(),
            indent: toyc_ast::printer::DEFAULT_INDENT,
        }
    }
}

/// Compilation session
pub struct Session {
    options: Options,
    ctx: GenContext,
}

impl Session {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            ctx: GenContext::new(options.gen),
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Write the requested output for `tree` to `out`
    pub fn compile<W: Write>(&mut self, tree: &Node, out: &mut W) -> Result<()> {
        match self.options.emit {
            EmitType::Ast => {
                TreePrinter::new(&mut *out)
                    .with_indent(self.options.indent)
                    .print(Some(tree), 0)?;
            }
            EmitType::Asm => generate(tree, &mut self.ctx, out)?,
        }
        Ok(())
    }

    /// Warnings reported since the last call
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.ctx.take_diagnostics()
    }
}

/// Read and decode an AST document
pub fn load_tree(path: &Path) -> Result<Node> {
    let text = std::fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DriverError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the driver; returns the number of warnings reported
pub fn run(cli: &Cli) -> Result<usize> {
    let config = Config::load(cli.config.as_deref())?;
    let options = Options::resolve(cli, &config);
    debug!(?options, "resolved options");

    let tree = load_tree(&cli.input)?;
    info!(input = %cli.input.display(), nodes = tree.count(), "loaded AST");

    let mut session = Session::new(options);
    match &cli.output {
        Some(path) => {
            // A failed run must not leave a truncated listing behind.
            let mut listing = Vec::new();
            session.compile(&tree, &mut listing)?;
            std::fs::write(path, &listing).map_err(|source| DriverError::Write {
                path: path.clone(),
                source,
            })?;
            info!(output = %path.display(), bytes = listing.len(), "wrote output");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            session.compile(&tree, &mut out)?;
            out.flush()?;
        }
    }
    destroy_tree(Some(tree));

    let diagnostics = session.take_diagnostics();
    for diagnostic in &diagnostics {
        warn!("{}", diagnostic);
    }
    Ok(diagnostics.len())
}
