// Machine
mod state;
pub use state::{Flag, Machine, Register, MEMORY_SIZE, REGISTER_COUNT, STACK_TOP};
mod alu;
pub use alu::{compare, AluOp};

// Running
mod ops;
pub use ops::{Instruction, Opcode};
mod runtime;
pub use runtime::{Cpu, Status};

// Loading
mod loader;
pub use loader::Program;
mod span;

mod error;
pub use error::Fault;

pub mod output;

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 3;
