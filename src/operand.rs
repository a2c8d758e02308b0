//! Operand words and the two ways of resolving them.
//!
//! A raw operand word is either a literal (`0..=32767`) or a register
//! reference (`32768..=32775`). Reads turn a register reference into the
//! register's value; writes turn a literal into a program-memory offset.
//! Anything above `r7` is rejected by both.

use crate::constants::{MAX_LITERAL, NUM_REGISTERS, REGISTER_BASE, REGISTER_LAST};
use std::fmt;

/// One of the eight general-purpose registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register(u8);

impl Register {
    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < NUM_REGISTERS).then_some(Register(index))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A decoded operand word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Literal(u16),
    Register(Register),
}

impl Operand {
    /// Classify a raw word; `None` for words above the register range.
    pub fn decode(word: u16) -> Option<Self> {
        match word {
            0..=MAX_LITERAL => Some(Operand::Literal(word)),
            REGISTER_BASE..=REGISTER_LAST => {
                Some(Operand::Register(Register((word - REGISTER_BASE) as u8)))
            }
            _ => None,
        }
    }
}

/// Destination of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Register(Register),
    Memory(u16),
}

impl Location {
    pub fn decode(word: u16) -> Option<Self> {
        Operand::decode(word).map(|operand| match operand {
            Operand::Literal(offset) => Location::Memory(offset),
            Operand::Register(reg) => Location::Register(reg),
        })
    }
}

/// Renders a raw operand word the way trace logs show it.
pub struct DisplayWord(pub u16);

impl fmt::Display for DisplayWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Operand::decode(self.0) {
            Some(Operand::Literal(value)) => write!(f, "{value}"),
            Some(Operand::Register(reg)) => write!(f, "{reg}"),
            None => write!(f, "<bad {}>", self.0),
        }
    }
}
