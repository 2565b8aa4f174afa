use std::io::Write;

use log::trace;

use crate::{
    error::Fault,
    ops::Instruction,
    output,
    state::{Flag, Machine},
};

/// Whether the engine will execute another instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Running,
    Halted,
}

/// Where the program counter goes after an instruction.
enum Flow {
    /// Advance past the instruction and its operands
    Next,
    /// Replace the program counter outright
    Jump(u8),
    Halt,
}

/// Fetch-decode-execute engine driving one [`Machine`].
pub struct Cpu {
    machine: Machine,
    status: Status,
    /// Print a trace line before each instruction
    trace: bool,
}

impl Cpu {
    pub fn new(machine: Machine) -> Cpu {
        Cpu {
            machine,
            status: Status::Running,
            trace: false,
        }
    }

    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_halted(&self) -> bool {
        self.status == Status::Halted
    }

    /// Run until `HLT` or the first fault.
    ///
    /// `PRN` output goes to `out`.
    pub fn run(&mut self, out: &mut impl Write) -> Result<(), Fault> {
        while self.step(out)? == Status::Running {}
        Ok(())
    }

    /// Execute a single instruction. Does nothing once halted.
    ///
    /// A fault halts the machine; no later instruction runs.
    pub fn step(&mut self, out: &mut impl Write) -> Result<Status, Fault> {
        if self.is_halted() {
            return Ok(Status::Halted);
        }
        match self.cycle(out) {
            Ok(status) => {
                self.status = status;
                Ok(status)
            }
            Err(fault) => {
                self.status = Status::Halted;
                Err(fault)
            }
        }
    }

    fn cycle(&mut self, out: &mut impl Write) -> Result<Status, Fault> {
        let pc = self.machine.pc();
        // Operand bytes are fetched even when unused
        let bytes = [
            self.machine.read_memory(pc),
            self.machine.read_memory(pc.wrapping_add(1)),
            self.machine.read_memory(pc.wrapping_add(2)),
        ];
        if self.trace {
            eprintln!("{}", output::trace(&self.machine));
        }

        let instr = Instruction::decode(pc, bytes)?;
        trace!("{pc:#04x}: {instr}");

        match self.execute(instr, out)? {
            Flow::Next => self.machine.set_pc(pc.wrapping_add(instr.width())),
            Flow::Jump(target) => self.machine.set_pc(target),
            Flow::Halt => return Ok(Status::Halted),
        }
        Ok(Status::Running)
    }

    fn execute(&mut self, instr: Instruction, out: &mut impl Write) -> Result<Flow, Fault> {
        let m = &mut self.machine;
        let flow = match instr {
            Instruction::Ldi { dest, imm } => {
                m.set_reg(dest, imm);
                Flow::Next
            }
            Instruction::Prn { src } => {
                writeln!(out, "{}", m.reg(src)).map_err(Fault::Output)?;
                Flow::Next
            }
            Instruction::Alu { op, a, b } => {
                m.alu(op, a, b);
                Flow::Next
            }
            Instruction::Jmp { target } => Flow::Jump(m.reg(target)),
            Instruction::Jeq { target } => {
                if m.flag() == Flag::Equal {
                    Flow::Jump(m.reg(target))
                } else {
                    Flow::Next
                }
            }
            Instruction::Jne { target } => {
                if m.flag() != Flag::Equal {
                    Flow::Jump(m.reg(target))
                } else {
                    Flow::Next
                }
            }
            Instruction::Push { src } => {
                m.push_register(src);
                Flow::Next
            }
            Instruction::Pop { dest } => {
                m.pop_register(dest);
                Flow::Next
            }
            Instruction::Call { target } => {
                let return_addr = m.pc().wrapping_add(instr.width());
                m.push(return_addr);
                Flow::Jump(m.reg(target))
            }
            Instruction::Ret => Flow::Jump(m.pop()),
            Instruction::Hlt => Flow::Halt,
        };
        Ok(flow)
    }
}
