use std::cmp::Ordering;

use crate::state::{Flag, Machine, Register};

/// Operations the arithmetic/logic unit can perform.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AluOp {
    Add,
    Mul,
    Cmp,
}

/// Flag produced by comparing two register values as unsigned bytes.
pub fn compare(a: u8, b: u8) -> Flag {
    match a.cmp(&b) {
        Ordering::Less => Flag::Less,
        Ordering::Equal => Flag::Equal,
        Ordering::Greater => Flag::Greater,
    }
}

impl Machine {
    /// Run `op` over registers `a` and `b`.
    ///
    /// Results are stored in `a` and wrap at 8 bits. `CMP` only writes the flag.
    /// Never touches memory or the program counter.
    pub fn alu(&mut self, op: AluOp, a: Register, b: Register) {
        let val_a = self.reg(a);
        let val_b = self.reg(b);
        match op {
            AluOp::Add => self.set_reg(a, val_a.wrapping_add(val_b)),
            AluOp::Mul => self.set_reg(a, val_a.wrapping_mul(val_b)),
            AluOp::Cmp => self.set_flag(compare(val_a, val_b)),
        }
    }
}
