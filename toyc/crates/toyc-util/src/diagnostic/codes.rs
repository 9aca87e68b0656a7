//! Diagnostic codes for categorizing backend warnings and errors.
//!
//! # Examples
//!
//! ```
//! use toyc_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::W_UNKNOWN_ARITH_OP;
//! assert_eq!(code.prefix(), "W");
//! assert_eq!(code.number(), 101);
//! assert_eq!(code.as_str(), "W0101");
//! ```

/// A unique code identifying a diagnostic message
///
/// Diagnostic codes follow the format `{prefix}{number}` where:
/// - `prefix` is "E" for errors or "W" for warnings
/// - `number` is a 4-digit number (padded with zeros)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix (e.g., "E" for error, "W" for warning)
    pub prefix: &'static str,
    /// The numeric identifier
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix (e.g., "E" for error, "W" for warning)
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Get the full code string (e.g., "E0001", "W0101")
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // ERROR CODES
    // =========================================================================

    /// E0001: The tree handed to the generator is not rooted at a program
    pub const E_NOT_A_PROGRAM: Self = Self::new("E", 1);
    /// E0002: A placeholder was hit while running in strict mode
    pub const E_STRICT_PLACEHOLDER: Self = Self::new("E", 2);
    /// E0003: No label numbers are left for a branch target
    pub const E_LABELS_EXHAUSTED: Self = Self::new("E", 3);

    // =========================================================================
    // CODE GENERATION WARNINGS (W0101-W0199)
    // =========================================================================

    /// W0101: Arithmetic operator code with no lowering
    pub const W_UNKNOWN_ARITH_OP: Self = Self::new("W", 101);
    /// W0102: Relational operator code with no branch instruction
    pub const W_UNKNOWN_REL_OP: Self = Self::new("W", 102);
    /// W0103: Constant of a value type that cannot be loaded
    pub const W_UNKNOWN_CONSTANT: Self = Self::new("W", 103);
    /// W0104: String constant with no collected literal label
    pub const W_UNBOUND_STRING: Self = Self::new("W", 104);
    /// W0105: Frame slot beyond the fixed frame
    pub const W_FRAME_SLOT_OVERFLOW: Self = Self::new("W", 105);
    /// W0106: Argument position beyond the saved argument registers
    pub const W_ARG_REGISTER_OVERFLOW: Self = Self::new("W", 106);
    /// W0107: Relational expression lowered outside a branch condition
    pub const W_DETACHED_RELATIONAL: Self = Self::new("W", 107);
    /// W0108: Declaration of a type with no storage layout
    pub const W_UNSUPPORTED_DECL: Self = Self::new("W", 108);
    /// W0109: Program node nested below the root
    pub const W_NESTED_PROGRAM: Self = Self::new("W", 109);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
