//! Instruction decoding.
//!
//! Each fetch produces one [`Instruction`] carrying its raw operand words.
//! Operands stay unresolved here; the executor decides per instruction
//! whether a word is read as a value or used as a write target.

use crate::error::{Result, VmError};
use crate::memory::ProgramMemory;
use crate::opcodes::{self, Opcode};
use crate::operand::DisplayWord;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Halt,
    Set { dst: u16, src: u16 },
    Push { src: u16 },
    Pop { dst: u16 },
    Eq { dst: u16, lhs: u16, rhs: u16 },
    Gt { dst: u16, lhs: u16, rhs: u16 },
    Jmp { target: u16 },
    Jt { cond: u16, target: u16 },
    Jf { cond: u16, target: u16 },
    Add { dst: u16, lhs: u16, rhs: u16 },
    Mult { dst: u16, lhs: u16, rhs: u16 },
    Mod { dst: u16, lhs: u16, rhs: u16 },
    And { dst: u16, lhs: u16, rhs: u16 },
    Or { dst: u16, lhs: u16, rhs: u16 },
    Not { dst: u16, src: u16 },
    Rmem { dst: u16, addr: u16 },
    Wmem { addr: u16, src: u16 },
    Call { target: u16 },
    Ret,
    Out { src: u16 },
    In { dst: u16 },
    Noop,
}

impl Instruction {
    fn from_parts(opcode: Opcode, ops: [u16; 3]) -> Self {
        let [a, b, c] = ops;
        match opcode {
            Opcode::Halt => Instruction::Halt,
            Opcode::Set => Instruction::Set { dst: a, src: b },
            Opcode::Push => Instruction::Push { src: a },
            Opcode::Pop => Instruction::Pop { dst: a },
            Opcode::Eq => Instruction::Eq { dst: a, lhs: b, rhs: c },
            Opcode::Gt => Instruction::Gt { dst: a, lhs: b, rhs: c },
            Opcode::Jmp => Instruction::Jmp { target: a },
            Opcode::Jt => Instruction::Jt { cond: a, target: b },
            Opcode::Jf => Instruction::Jf { cond: a, target: b },
            Opcode::Add => Instruction::Add { dst: a, lhs: b, rhs: c },
            Opcode::Mult => Instruction::Mult { dst: a, lhs: b, rhs: c },
            Opcode::Mod => Instruction::Mod { dst: a, lhs: b, rhs: c },
            Opcode::And => Instruction::And { dst: a, lhs: b, rhs: c },
            Opcode::Or => Instruction::Or { dst: a, lhs: b, rhs: c },
            Opcode::Not => Instruction::Not { dst: a, src: b },
            Opcode::Rmem => Instruction::Rmem { dst: a, addr: b },
            Opcode::Wmem => Instruction::Wmem { addr: a, src: b },
            Opcode::Call => Instruction::Call { target: a },
            Opcode::Ret => Instruction::Ret,
            Opcode::Out => Instruction::Out { src: a },
            Opcode::In => Instruction::In { dst: a },
            Opcode::Noop => Instruction::Noop,
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Halt => Opcode::Halt,
            Instruction::Set { .. } => Opcode::Set,
            Instruction::Push { .. } => Opcode::Push,
            Instruction::Pop { .. } => Opcode::Pop,
            Instruction::Eq { .. } => Opcode::Eq,
            Instruction::Gt { .. } => Opcode::Gt,
            Instruction::Jmp { .. } => Opcode::Jmp,
            Instruction::Jt { .. } => Opcode::Jt,
            Instruction::Jf { .. } => Opcode::Jf,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Mult { .. } => Opcode::Mult,
            Instruction::Mod { .. } => Opcode::Mod,
            Instruction::And { .. } => Opcode::And,
            Instruction::Or { .. } => Opcode::Or,
            Instruction::Not { .. } => Opcode::Not,
            Instruction::Rmem { .. } => Opcode::Rmem,
            Instruction::Wmem { .. } => Opcode::Wmem,
            Instruction::Call { .. } => Opcode::Call,
            Instruction::Ret => Opcode::Ret,
            Instruction::Out { .. } => Opcode::Out,
            Instruction::In { .. } => Opcode::In,
            Instruction::Noop => Opcode::Noop,
        }
    }

    /// Raw operand words in encoding order.
    pub fn operands(&self) -> Vec<u16> {
        match *self {
            Instruction::Halt | Instruction::Ret | Instruction::Noop => vec![],
            Instruction::Push { src } | Instruction::Out { src } => vec![src],
            Instruction::Pop { dst } | Instruction::In { dst } => vec![dst],
            Instruction::Jmp { target } | Instruction::Call { target } => vec![target],
            Instruction::Set { dst, src } | Instruction::Not { dst, src } => vec![dst, src],
            Instruction::Jt { cond, target } | Instruction::Jf { cond, target } => {
                vec![cond, target]
            }
            Instruction::Rmem { dst, addr } => vec![dst, addr],
            Instruction::Wmem { addr, src } => vec![addr, src],
            Instruction::Eq { dst, lhs, rhs }
            | Instruction::Gt { dst, lhs, rhs }
            | Instruction::Add { dst, lhs, rhs }
            | Instruction::Mult { dst, lhs, rhs }
            | Instruction::Mod { dst, lhs, rhs }
            | Instruction::And { dst, lhs, rhs }
            | Instruction::Or { dst, lhs, rhs } => vec![dst, lhs, rhs],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode().mnemonic())?;
        for word in self.operands() {
            write!(f, " {}", DisplayWord(word))?;
        }
        Ok(())
    }
}

/// Decode the instruction whose opcode word sits at `address`.
///
/// Returns the instruction and the offset of the word following it.
pub fn decode(memory: &ProgramMemory, address: u16) -> Result<(Instruction, u16)> {
    let word = memory
        .load(address)
        .ok_or(VmError::InstructionPointerOutOfRange { address })?;
    let opcode = opcodes::lookup(word).ok_or(VmError::InvalidOpcode {
        opcode: word,
        address,
    })?;

    let mut ops = [0u16; 3];
    let mut cursor = address.wrapping_add(1);
    for slot in ops.iter_mut().take(opcode.arity()) {
        *slot = memory
            .load(cursor)
            .ok_or(VmError::InstructionPointerOutOfRange { address })?;
        cursor = cursor.wrapping_add(1);
    }
    Ok((Instruction::from_parts(opcode, ops), cursor))
}
