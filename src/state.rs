use std::fmt;

use crate::error::Fault;

/// The LS-8 can address 256 bytes of memory.
pub const MEMORY_SIZE: usize = 0x100;
/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 8;
/// Initial value of the stack pointer. The stack grows downward from here.
pub const STACK_TOP: u8 = 0xF4;

/// Represents the CPU registers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Register {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    /// Reserved as the stack pointer.
    R7,
}

impl Register {
    pub const SP: Register = Register::R7;

    const ALL: [Register; REGISTER_COUNT] = [
        Register::R0,
        Register::R1,
        Register::R2,
        Register::R3,
        Register::R4,
        Register::R5,
        Register::R6,
        Register::R7,
    ];

    /// Register named by an operand byte, if there is one.
    pub fn from_index(index: u8) -> Option<Register> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.index())
    }
}

/// Outcome of the most recent `CMP`.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Flag {
    /// No comparison has happened yet.
    #[default]
    Clear = 0b000,
    Equal = 0b001,
    Greater = 0b010,
    Less = 0b100,
}

impl Flag {
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// Complete machine state: registers, memory, program counter and flag.
///
/// Holds no control logic; the engine in [`crate::Cpu`] drives it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Machine {
    /// System memory - 256 bytes, shared between program and stack.
    mem: [u8; MEMORY_SIZE],
    /// Program counter
    pc: u8,
    /// 8x 8-bit registers
    reg: [u8; REGISTER_COUNT],
    /// Comparison flag
    flag: Flag,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Machine {
        let mut reg = [0; REGISTER_COUNT];
        reg[Register::SP.index()] = STACK_TOP;
        Machine {
            mem: [0; MEMORY_SIZE],
            pc: 0,
            reg,
            flag: Flag::Clear,
        }
    }

    /// Fresh machine with `program` placed at address 0.
    pub fn with_program(program: &crate::Program) -> Machine {
        let mut machine = Machine::new();
        machine.copy_image(program.bytes());
        machine
    }

    /// Write a program image into memory starting at address 0.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Fault> {
        if image.len() > MEMORY_SIZE {
            return Err(Fault::ImageTooLarge { len: image.len() });
        }
        self.copy_image(image);
        Ok(())
    }

    fn copy_image(&mut self, image: &[u8]) {
        for (cell, byte) in self.mem.iter_mut().zip(image) {
            *cell = *byte;
        }
    }

    #[inline]
    pub fn read_memory(&self, address: u8) -> u8 {
        self.mem[address as usize]
    }

    #[inline]
    pub fn write_memory(&mut self, address: u8, value: u8) {
        self.mem[address as usize] = value;
    }

    /// Read a register by raw index. Indices past `R7` are a fault at the current PC.
    pub fn read_register(&self, index: u8) -> Result<u8, Fault> {
        Ok(self.reg(self.register_at(index)?))
    }

    pub fn write_register(&mut self, index: u8, value: u8) -> Result<(), Fault> {
        let reg = self.register_at(index)?;
        self.set_reg(reg, value);
        Ok(())
    }

    fn register_at(&self, index: u8) -> Result<Register, Fault> {
        Register::from_index(index).ok_or(Fault::InvalidRegister {
            index,
            address: self.pc,
        })
    }

    #[inline]
    pub fn reg(&self, reg: Register) -> u8 {
        self.reg[reg.index()]
    }

    #[inline]
    pub fn set_reg(&mut self, reg: Register, value: u8) {
        self.reg[reg.index()] = value;
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.reg
    }

    pub fn memory(&self) -> &[u8; MEMORY_SIZE] {
        &self.mem
    }

    pub fn pc(&self) -> u8 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u8) {
        self.pc = pc;
    }

    pub fn flag(&self) -> Flag {
        self.flag
    }

    pub fn set_flag(&mut self, flag: Flag) {
        self.flag = flag;
    }

    pub fn sp(&self) -> u8 {
        self.reg(Register::SP)
    }

    /// Pre-decrement the stack pointer, then store the value of `reg` at the new top.
    ///
    /// `reg` is read after the decrement, so pushing `R7` stores the new stack pointer.
    pub fn push_register(&mut self, reg: Register) {
        let sp = self.sp().wrapping_sub(1);
        self.set_reg(Register::SP, sp);
        let val = self.reg(reg);
        self.write_memory(sp, val);
    }

    pub fn push(&mut self, val: u8) {
        let sp = self.sp().wrapping_sub(1);
        self.set_reg(Register::SP, sp);
        self.write_memory(sp, val);
    }

    /// Store the top of the stack in `reg`, then post-increment the stack pointer.
    ///
    /// The increment reads the stack pointer after `reg` is written, so popping
    /// into `R7` leaves it one past the popped value.
    pub fn pop_register(&mut self, reg: Register) {
        let val = self.read_memory(self.sp());
        self.set_reg(reg, val);
        self.set_reg(Register::SP, self.sp().wrapping_add(1));
    }

    /// Read the top of the stack, then post-increment the stack pointer.
    pub fn pop(&mut self) -> u8 {
        let sp = self.sp();
        let val = self.read_memory(sp);
        self.set_reg(Register::SP, sp.wrapping_add(1));
        val
    }
}
