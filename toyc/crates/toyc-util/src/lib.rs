//! toyc-util - Shared foundation types for the toyc backend
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! Small building blocks shared by every phase crate:
//!
//! 1. DIAGNOSTICS
//!    [`diagnostic::Handler`] collects warnings and errors reported while a
//!    tree is printed or lowered. The backend never unwinds on a malformed
//!    node; it reports here and keeps going.
//!
//! 2. TYPED INDICES
//!    [`IndexVec`] is a `Vec` addressed by a newtype index, used for dense
//!    numbering schemes such as string-literal ids. [`define_idx!`] declares
//!    such a newtype.
//!
//! 3. HASHING
//!    `FxHashMap` is re-exported so every crate hashes the same way.

pub mod diagnostic;
pub mod index_vec;

pub use diagnostic::{Diagnostic, DiagnosticCode, Handler, Level};
pub use index_vec::{Idx, IndexVec};

// Re-export commonly used types
pub use rustc_hash::FxHashMap;
