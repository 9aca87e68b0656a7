//! RV32 target description for the RARS simulator.
//!
//! Every function gets the same fixed frame:
//!
//! ```text
//!   fp+0    saved ra
//!   fp+4    saved fp
//!   fp+8    a0 / slot 0
//!   ...
//!   fp+28   a5 / slot 5
//!   fp+32   slot 6
//!   ...
//!   fp+124  slot 29
//! ```
//!
//! Parameters occupy the first slots, so a parameter in slot `n` is the
//! saved copy of argument register `an`.

use std::fmt;
use std::io::{self, Write};

/// Bytes per machine word
pub const WORD_SIZE: u32 = 4;

/// Fixed stack frame size of every generated function
pub const FRAME_SIZE: u32 = 128;

/// Argument registers `a0..a5` saved by the prologue
pub const SAVED_ARG_REGS: u32 = 6;

/// Words below the first frame slot (saved ra and fp)
pub const FRAME_SLOT_BASE: u32 = 2;

pub const SYS_PRINT_INT: u32 = 1;
pub const SYS_PRINT_STR: u32 = 4;
pub const SYS_READ_INT: u32 = 5;
pub const SYS_EXIT: u32 = 93;

/// Offset of frame slot `slot` from `fp`
pub fn slot_offset(slot: u32) -> u32 {
    slot.saturating_add(FRAME_SLOT_BASE).saturating_mul(WORD_SIZE)
}

/// Whether `slot` lies inside the fixed frame
pub fn slot_in_frame(slot: u32) -> bool {
    slot_offset(slot) < FRAME_SIZE
}

/// A branch target `.LL<n>`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".LL{}", self.0)
    }
}

/// Allocate the frame, save fp and ra, point fp at the frame and spill the
/// incoming argument registers.
pub fn write_prologue<W: Write>(out: &mut W) -> io::Result<()> {
    write!(
        out,
        "\taddi\tsp, sp, -{}\n\tsw\t\tfp, 4(sp)\n\tsw\t\tra, 0(sp)\n\tmv\t\tfp, sp\n",
        FRAME_SIZE
    )?;
    for reg in 0..SAVED_ARG_REGS {
        writeln!(out, "\tsw\t\ta{}, {}(sp)", reg, slot_offset(reg))?;
    }
    Ok(())
}

pub fn write_epilogue<W: Write>(out: &mut W) -> io::Result<()> {
    write!(
        out,
        "\tmv\t\tsp, fp\n\tlw\t\tfp, 4(sp)\n\tlw\t\tra, 0(sp)\n\taddi\tsp, sp, {}\n\tret\n\n",
        FRAME_SIZE
    )
}

/// Save `t0` on the expression stack
pub const PUSH_T0: &str = "\taddi\tsp, sp, -4\n\tsw\t\tt0, 0(sp)\n";

/// Pop the expression stack into `t1`
pub const POP_T1: &str = "\tlw\t\tt1, 0(sp)\n\taddi\tsp, sp, 4\n";
