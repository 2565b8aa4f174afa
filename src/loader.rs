use std::{fs, path::Path};

use log::debug;
use miette::{IntoDiagnostic, Result};

use crate::{
    error,
    span::{Idx, Span},
    state::MEMORY_SIZE,
};

/// Program image ready to be placed in memory at address 0.
///
/// Always fits in memory.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Read and parse a program file.
    pub fn read(path: &Path) -> Result<Program> {
        let src = fs::read_to_string(path).into_diagnostic()?;
        Program::parse_named(&path.display().to_string(), &src)
    }

    pub fn parse(src: &str) -> Result<Program> {
        Program::parse_named("<program>", src)
    }

    /// Parse a text program image.
    ///
    /// Each line holds at most one byte written in binary. Anything after a `#` is a
    /// comment, and lines left empty once comments and whitespace are removed are
    /// skipped.
    pub fn parse_named(name: &str, src: &str) -> Result<Program> {
        let mut bytes = Vec::new();
        let mut offs = 0;

        for line in src.split_inclusive('\n') {
            let line_start = offs;
            offs += line.len();

            let code = line.split('#').next().unwrap_or_default();
            let literal = code.trim();
            if literal.is_empty() {
                continue;
            }
            let lead = code.len() - code.trim_start().len();
            let span = Span::new(Idx(line_start + lead), literal.len());

            if !literal.chars().all(|ch| ch == '0' || ch == '1') {
                return Err(error::load_bad_lit(span, name, src));
            }
            // Only digits remain, so the sole failure is overflow
            let Ok(byte) = u8::from_str_radix(literal, 2) else {
                return Err(error::load_too_wide(span, name, src));
            };
            if bytes.len() == MEMORY_SIZE {
                return Err(error::load_too_long(span, name, src));
            }
            bytes.push(byte);
        }

        debug!("loaded {} bytes from {name}", bytes.len());
        Ok(Program { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl TryFrom<Vec<u8>> for Program {
    type Error = crate::Fault;

    fn try_from(bytes: Vec<u8>) -> std::result::Result<Self, Self::Error> {
        if bytes.len() > MEMORY_SIZE {
            return Err(crate::Fault::ImageTooLarge { len: bytes.len() });
        }
        Ok(Program { bytes })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_bytes_and_comments() {
        let src = "\
# print8.ls8: Print the number 8 on the screen

10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
";
        let program = Program::parse(src).unwrap();
        assert_eq!(
            program.bytes(),
            &[0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]
        );
        assert_eq!(program.len(), 6);
    }

    #[test]
    fn tolerates_whitespace_and_crlf() {
        let src = "  10000010  \r\n\t1\r\n   # indented comment\r\n0#no space";
        let program = Program::parse(src).unwrap();
        assert_eq!(program.bytes(), &[0b1000_0010, 1, 0]);
    }

    #[test]
    fn leading_zeros_are_not_width() {
        let program = Program::parse("0000000011111111\n").unwrap();
        assert_eq!(program.bytes(), &[0xFF]);
    }

    #[test]
    fn empty_source() {
        assert!(Program::parse("").unwrap().is_empty());
        assert!(Program::parse("# nothing\n\n   \n").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_literal() {
        let err = Program::parse("10000010\n10020000\n").unwrap_err();
        assert!(err.to_string().contains("invalid binary literal"));
        assert_eq!(err.code().unwrap().to_string(), "load::bad_lit");

        let err = Program::parse("LDI\n").unwrap_err();
        assert_eq!(err.code().unwrap().to_string(), "load::bad_lit");
    }

    #[test]
    fn rejects_wide_literal() {
        let err = Program::parse("100000000\n").unwrap_err();
        assert_eq!(err.code().unwrap().to_string(), "load::too_wide");
    }

    #[test]
    fn rejects_long_program() {
        let full = "1\n".repeat(MEMORY_SIZE);
        assert_eq!(Program::parse(&full).unwrap().len(), MEMORY_SIZE);

        let over = full + "1\n";
        let err = Program::parse(&over).unwrap_err();
        assert_eq!(err.code().unwrap().to_string(), "load::too_long");
    }

    #[test]
    fn from_raw_bytes() {
        assert_eq!(Program::try_from(vec![1, 2]).unwrap().bytes(), &[1, 2]);
        assert!(Program::try_from(vec![0; MEMORY_SIZE + 1]).is_err());
    }
}
