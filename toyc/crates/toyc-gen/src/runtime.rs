//! Fixed text of the emitted listing: section banners, the exit sequence and
//! the library helpers every program links against.

use std::io::{self, Write};

use crate::riscv::{SYS_EXIT, SYS_PRINT_INT, SYS_PRINT_STR, SYS_READ_INT};

pub const FILE_HEADER: &str = "#\n# RISC-V assembly output\n#\n\n";
pub const DATA_SECTION: &str = "#\n# Data section\n#\n\t.data\n\n";
pub const STRING_CONSTANTS: &str = "# string constants\n";
pub const GLOBAL_SYMBOLS: &str = "\n# global symbols (variables)\n";
pub const TEXT_SECTION: &str = "\n#\n# Program instructions\n#\n\t.text\nprogram:\n";
pub const FUNCTIONS_HEADER: &str = "#\n# Declared Functions\n#\n\n";
pub const LIBRARY_HEADER: &str = "#\n# Library functions\n#\n\n";

/// A library routine that is a single environment call
#[derive(Debug, Clone, Copy)]
pub struct Helper {
    pub name: &'static str,
    pub comment: &'static str,
    pub syscall: u32,
}

pub const HELPERS: [Helper; 3] = [
    Helper {
        name: "printStr",
        comment: "Print a null-terminated string: arg: a0 == string address",
        syscall: SYS_PRINT_STR,
    },
    Helper {
        name: "printInt",
        comment: "Print a decimal integer: arg: a0 == value",
        syscall: SYS_PRINT_INT,
    },
    Helper {
        name: "readInt",
        comment: "Read in a decimal integer: return: a0 == value",
        syscall: SYS_READ_INT,
    },
];

/// Exit the program with status 0
pub fn write_exit<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\tli\t\ta0, 0\n\tli\t\ta7, {}\n\tecall\n\n", SYS_EXIT)
}

pub fn write_library<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(LIBRARY_HEADER.as_bytes())?;
    for helper in &HELPERS {
        write!(
            out,
            "# {}\n{}:\n\tli\t\ta7, {}\n\tecall\n\tret\n\n",
            helper.comment, helper.name, helper.syscall
        )?;
    }
    Ok(())
}

/// Whether `name` is one of the library helpers
pub fn is_helper(name: &str) -> bool {
    HELPERS.iter().any(|helper| helper.name == name)
}
