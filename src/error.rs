use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VmError>;

/// Failures while turning a program image into program memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("program image is empty")]
    Empty,
    #[error("program image has odd length ({len} bytes)")]
    OddLength { len: usize },
    #[error("program image has {words} words; at most {max} fit in memory")]
    TooLarge { words: usize, max: usize },
}

/// Errors that stop the interpreter loop.
///
/// `address` is always the offset of the opcode word of the instruction that
/// failed, not the position the instruction pointer had advanced to.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("invalid opcode {opcode} at {address}")]
    InvalidOpcode { opcode: u16, address: u16 },
    #[error("invalid operand {word} at {address}")]
    InvalidOperand { word: u16, address: u16 },
    #[error("instruction at {address} runs past program memory")]
    InstructionPointerOutOfRange { address: u16 },
    #[error("memory offset {offset} at {address} is outside program memory")]
    AddressOutOfRange { offset: u16, address: u16 },
    #[error("stack underflow at {address}")]
    StackUnderflow { address: u16 },
    #[error("division by zero at {address}")]
    DivideByZero { address: u16 },
    #[error("input exhausted at {address}")]
    InputExhausted { address: u16 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl VmError {
    /// Process exit status used by the command-line runner.
    pub fn exit_code(&self) -> i32 {
        match self {
            VmError::InvalidOpcode { .. }
            | VmError::InvalidOperand { .. }
            | VmError::InstructionPointerOutOfRange { .. }
            | VmError::AddressOutOfRange { .. } => 2,
            VmError::StackUnderflow { .. } => 3,
            VmError::DivideByZero { .. } => 4,
            VmError::InputExhausted { .. } | VmError::Io(_) => 5,
        }
    }
}
