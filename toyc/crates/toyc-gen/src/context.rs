//! Per-run generation state.

use std::io::Write;

use tracing::trace;
use toyc_util::{Diagnostic, DiagnosticCode, Handler};

use crate::error::{CodeGenError, Result};
use crate::riscv::Label;
use crate::strings::StringTable;

/// First number handed out by both label counters unless configured
pub const DEFAULT_LABEL_BASE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenOptions {
    /// First `.LL` number
    pub label_base: u32,
    /// Return malformed shapes as errors instead of emitting placeholders
    pub strict: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            label_base: DEFAULT_LABEL_BASE,
            strict: false,
        }
    }
}

/// State threaded through a generation run.
///
/// The two label counters are independent namespaces. Branch labels are
/// allocated by `While` and `IfThen`; relational labels only by a relational
/// expression that appears outside any condition. Neither counter is reset
/// between runs on the same context, so labels stay unique across every
/// listing produced from it. The string table is reset by each run.
#[derive(Debug)]
pub struct GenContext {
    options: GenOptions,
    next_label: Option<u32>,
    next_relational: Option<u32>,
    strings: StringTable,
    handler: Handler,
}

impl GenContext {
    pub fn new(options: GenOptions) -> Self {
        Self {
            options,
            next_label: Some(options.label_base),
            next_relational: Some(options.label_base),
            strings: StringTable::new(),
            handler: Handler::new(),
        }
    }

    pub fn options(&self) -> GenOptions {
        self.options
    }

    /// Next branch label; fails once `.LL4294967295` has been handed out
    pub fn fresh_label(&mut self) -> Result<Label> {
        let label = allocate(&mut self.next_label)?;
        trace!(%label, "allocated branch label");
        Ok(label)
    }

    /// Label for a relational expression with no enclosing condition
    pub fn detached_label(&mut self) -> Result<Label> {
        let label = allocate(&mut self.next_relational)?;
        trace!(%label, "allocated relational label");
        Ok(label)
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn strings_mut(&mut self) -> &mut StringTable {
        &mut self.strings
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Drain the diagnostics reported so far
    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.handler.take()
    }

    /// Report a malformed node shape.
    ///
    /// In strict mode this is an error. Otherwise a comment line carrying
    /// `message` is written in place of the instruction and a warning is
    /// recorded.
    pub(crate) fn placeholder<W: Write>(
        &self,
        code: DiagnosticCode,
        message: String,
        out: &mut W,
    ) -> Result<()> {
        if self.options.strict {
            return Err(CodeGenError::Malformed { code, message });
        }
        writeln!(out, "\t# {}", message)?;
        self.handler.warn(code, message);
        Ok(())
    }
}

fn allocate(counter: &mut Option<u32>) -> Result<Label> {
    let n = counter.ok_or(CodeGenError::LabelsExhausted)?;
    *counter = n.checked_add(1);
    Ok(Label(n))
}

impl Default for GenContext {
    fn default() -> Self {
        Self::new(GenOptions::default())
    }
}
