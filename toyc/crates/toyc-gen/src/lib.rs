//! toyc-gen - RISC-V Code Generator
//!
//! ============================================================================
//! CODE GENERATION OVERVIEW
//! ============================================================================
//!
//! Lowers a resolved tree straight to RV32 assembly text for the RARS
//! simulator. There is no intermediate representation and no register
//! allocation: every expression is evaluated into `t0`, with the stack used
//! to hold a pending left operand.
//!
//! PHASES OF ONE RUN:
//! ------------------
//!
//! 1. STRING COLLECTION
//!    [`StringTable::collect`] numbers every string literal and writes the
//!    `.SC<n>` declarations at the top of the data section.
//!
//! 2. DATA SECTION
//!    One `.word` or `.space` per global declaration.
//!
//! 3. TEXT SECTION
//!    The top-level statements under the `program:` entry label, the exit
//!    sequence, every declared function with its fixed 128-byte frame, then
//!    the library helpers.
//!
//! ============================================================================
//! MALFORMED INPUT
//! ============================================================================
//!
//! The upstream stage is trusted to hand over a well-formed tree. Shapes the
//! generator cannot lower (an unknown operator code, a slot outside the
//! frame) become a `# ...` comment in the listing plus a warning in the
//! context's [`Handler`](toyc_util::Handler). With
//! [`GenOptions::strict`] set they are returned as
//! [`CodeGenError::Malformed`] instead.
//!
//! # Example
//!
//! ```
//! use toyc_ast::{Access, Node, Program, VarDecl};
//! use toyc_gen::{generate_string, GenContext};
//!
//! let program = Node::Program(Program {
//!     globals: vec![VarDecl::int("x")],
//!     functions: vec![],
//!     statements: vec![Node::assign("x", Access::Global, Node::int(5))],
//! });
//!
//! let mut ctx = GenContext::default();
//! let asm = generate_string(&program, &mut ctx).unwrap();
//! assert!(asm.contains("x: .word 0\n"));
//! assert!(asm.contains("\tli\t\tt0, 5\n\tsw\t\tt0, x, t1\n"));
//! ```

pub mod codegen;
pub mod context;
pub mod error;
pub mod riscv;
pub mod runtime;
pub mod strings;

pub use codegen::{generate, generate_string};
pub use context::{GenContext, GenOptions, DEFAULT_LABEL_BASE};
pub use error::{CodeGenError, Result};
pub use riscv::Label;
pub use strings::{StringId, StringTable};


#[cfg(test)]
mod edge_cases;
