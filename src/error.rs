use std::{error::Error, fmt, io};

use miette::{miette, Diagnostic, LabeledSpan, NamedSource, Report, Severity};

use crate::span::Span;

/// Fatal condition raised while running a program. Ends the run.
#[derive(Debug)]
pub enum Fault {
    /// The byte at `address` is not an instruction.
    UnknownOpcode { opcode: u8, address: u8 },
    /// An operand at `address` names a register past `R7`.
    InvalidRegister { index: u8, address: u8 },
    /// Program image does not fit in memory.
    ImageTooLarge { len: usize },
    /// `PRN` could not write to the output channel.
    Output(io::Error),
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode { opcode, address } => write!(
                f,
                "unknown instruction {opcode:#010b} ({opcode}) at address {address:#04x}"
            ),
            Self::InvalidRegister { index, address } => {
                write!(f, "invalid register R{index} at address {address:#04x}")
            }
            Self::ImageTooLarge { len } => write!(
                f,
                "program image of {len} bytes does not fit in {} bytes of memory",
                crate::MEMORY_SIZE
            ),
            Self::Output(err) => write!(f, "failed to write program output: {err}"),
        }
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Output(err) => Some(err),
            _ => None,
        }
    }
}

impl Diagnostic for Fault {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            Self::UnknownOpcode { .. } => "run::unknown_opcode",
            Self::InvalidRegister { .. } => "run::invalid_register",
            Self::ImageTooLarge { .. } => "run::image_too_large",
            Self::Output(_) => "run::output",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self {
            Self::UnknownOpcode { .. } => {
                "check that the program does not run into data, or jump to an unintended address"
            }
            Self::InvalidRegister { .. } => "registers are numbered from 0 to 7",
            Self::ImageTooLarge { .. } => "programs are limited to 256 bytes",
            Self::Output(_) => return None,
        };
        Some(Box::new(help))
    }
}

// Loader errors

pub fn load_bad_lit(span: Span, name: &str, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::bad_lit",
        help = "each line holds one byte written in binary, like 10000010",
        labels = vec![LabeledSpan::at(span, "not a binary literal")],
        "Encountered an invalid binary literal.",
    )
    .with_source_code(NamedSource::new(name, src.to_owned()))
}

pub fn load_too_wide(span: Span, name: &str, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::too_wide",
        help = "values range from 0 to 255, that is at most 8 significant bits",
        labels = vec![LabeledSpan::at(span, "does not fit in a byte")],
        "Binary literal is wider than 8 bits.",
    )
    .with_source_code(NamedSource::new(name, src.to_owned()))
}

pub fn load_too_long(span: Span, name: &str, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "load::too_long",
        help = "programs are limited to 256 bytes",
        labels = vec![LabeledSpan::at(span, "first byte past the end of memory")],
        "Program does not fit in memory.",
    )
    .with_source_code(NamedSource::new(name, src.to_owned()))
}
