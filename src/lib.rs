//! Interpreter for a 15-bit virtual machine with eight registers, a
//! word-addressed program memory and an unbounded stack.
//!
//! A run loads a little-endian word image into [`ProgramMemory`], wraps it in
//! a [`Machine`] and drives it with [`Machine::run`] against a [`Console`]
//! that supplies `in` characters and receives `out` characters.

pub mod console;
pub mod constants;
pub mod decode;
pub mod error;
pub mod machine;
pub mod memory;
pub mod opcodes;
pub mod operand;
pub mod state;

pub use console::{BufferConsole, Console, IoConsole};
pub use decode::{decode, Instruction};
pub use error::{LoadError, Result, VmError};
pub use machine::{Machine, Outcome, StepStatus};
pub use memory::{load_image, ProgramMemory};
pub use opcodes::Opcode;
pub use operand::{Location, Operand, Register};
pub use state::MachineState;
