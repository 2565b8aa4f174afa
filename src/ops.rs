use std::fmt;

use crate::{alu::AluOp, error::Fault, state::Register};

/// Every opcode the LS-8 understands.
///
/// The two high bits of each opcode hold the number of operand bytes that follow it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Opcode {
    Hlt = 0b0000_0001,
    Ret = 0b0001_0001,
    Push = 0b0100_0101,
    Pop = 0b0100_0110,
    Prn = 0b0100_0111,
    Call = 0b0101_0000,
    Jmp = 0b0101_0100,
    Jeq = 0b0101_0101,
    Jne = 0b0101_0110,
    Ldi = 0b1000_0010,
    Add = 0b1010_0000,
    Mul = 0b1010_0010,
    Cmp = 0b1010_0111,
}

impl Opcode {
    pub const ALL: [Opcode; 13] = [
        Opcode::Hlt,
        Opcode::Ret,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Prn,
        Opcode::Call,
        Opcode::Jmp,
        Opcode::Jeq,
        Opcode::Jne,
        Opcode::Ldi,
        Opcode::Add,
        Opcode::Mul,
        Opcode::Cmp,
    ];

    pub fn from_byte(byte: u8) -> Option<Opcode> {
        Self::ALL.into_iter().find(|op| *op as u8 == byte)
    }

    pub fn operand_count(self) -> u8 {
        (self as u8) >> 6
    }

    /// Bytes taken by the whole instruction, opcode included.
    pub fn width(self) -> u8 {
        1 + self.operand_count()
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Hlt => "HLT",
            Self::Ret => "RET",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Prn => "PRN",
            Self::Call => "CALL",
            Self::Jmp => "JMP",
            Self::Jeq => "JEQ",
            Self::Jne => "JNE",
            Self::Ldi => "LDI",
            Self::Add => "ADD",
            Self::Mul => "MUL",
            Self::Cmp => "CMP",
        }
    }
}

/// A decoded instruction with typed operands.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction {
    /// Load an immediate value into a register
    Ldi { dest: Register, imm: u8 },
    /// Print a register as a decimal number
    Prn { src: Register },
    /// Hand both registers to the ALU
    Alu {
        op: AluOp,
        a: Register,
        b: Register,
    },
    /// Jump to the address held in `target`
    Jmp { target: Register },
    Jeq { target: Register },
    Jne { target: Register },
    Push { src: Register },
    Pop { dest: Register },
    /// Push the return address and jump to the subroutine held in `target`
    Call { target: Register },
    Ret,
    Hlt,
}

impl Instruction {
    /// Decode the instruction found at `address`.
    ///
    /// `bytes` holds the opcode and the two bytes after it. Operands an instruction
    /// doesn't use are ignored.
    pub fn decode(address: u8, bytes: [u8; 3]) -> Result<Instruction, Fault> {
        let [opcode, op_a, op_b] = bytes;
        let reg = |index: u8| {
            Register::from_index(index).ok_or(Fault::InvalidRegister { index, address })
        };
        let Some(opcode) = Opcode::from_byte(opcode) else {
            return Err(Fault::UnknownOpcode { opcode, address });
        };

        let instr = match opcode {
            Opcode::Ldi => Self::Ldi {
                dest: reg(op_a)?,
                imm: op_b,
            },
            Opcode::Prn => Self::Prn { src: reg(op_a)? },
            Opcode::Add => Self::alu(AluOp::Add, reg(op_a)?, reg(op_b)?),
            Opcode::Mul => Self::alu(AluOp::Mul, reg(op_a)?, reg(op_b)?),
            Opcode::Cmp => Self::alu(AluOp::Cmp, reg(op_a)?, reg(op_b)?),
            Opcode::Jmp => Self::Jmp { target: reg(op_a)? },
            Opcode::Jeq => Self::Jeq { target: reg(op_a)? },
            Opcode::Jne => Self::Jne { target: reg(op_a)? },
            Opcode::Push => Self::Push { src: reg(op_a)? },
            Opcode::Pop => Self::Pop { dest: reg(op_a)? },
            Opcode::Call => Self::Call { target: reg(op_a)? },
            Opcode::Ret => Self::Ret,
            Opcode::Hlt => Self::Hlt,
        };
        Ok(instr)
    }

    fn alu(op: AluOp, a: Register, b: Register) -> Instruction {
        Self::Alu { op, a, b }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Ldi { .. } => Opcode::Ldi,
            Self::Prn { .. } => Opcode::Prn,
            Self::Alu { op, .. } => match op {
                AluOp::Add => Opcode::Add,
                AluOp::Mul => Opcode::Mul,
                AluOp::Cmp => Opcode::Cmp,
            },
            Self::Jmp { .. } => Opcode::Jmp,
            Self::Jeq { .. } => Opcode::Jeq,
            Self::Jne { .. } => Opcode::Jne,
            Self::Push { .. } => Opcode::Push,
            Self::Pop { .. } => Opcode::Pop,
            Self::Call { .. } => Opcode::Call,
            Self::Ret => Opcode::Ret,
            Self::Hlt => Opcode::Hlt,
        }
    }

    pub fn width(&self) -> u8 {
        self.opcode().width()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode().mnemonic();
        match self {
            Self::Ldi { dest, imm } => write!(f, "{name} {dest}, {imm}"),
            Self::Alu { a, b, .. } => write!(f, "{name} {a}, {b}"),
            Self::Prn { src } | Self::Push { src } => write!(f, "{name} {src}"),
            Self::Pop { dest } => write!(f, "{name} {dest}"),
            Self::Jmp { target }
            | Self::Jeq { target }
            | Self::Jne { target }
            | Self::Call { target } => write!(f, "{name} {target}"),
            Self::Ret | Self::Hlt => write!(f, "{name}"),
        }
    }
}
