//! Architectural constants of the 15-bit virtual machine.

/// All arithmetic wraps at this value (15-bit unsigned).
pub const MODULUS: u16 = 0x8000;

/// Mask applied to bitwise results so they stay within 15 bits.
pub const VALUE_MASK: u16 = 0x7FFF;

/// Largest word that is interpreted as a literal operand.
pub const MAX_LITERAL: u16 = MODULUS - 1;

/// First operand word that names a register (`r0`).
pub const REGISTER_BASE: u16 = MODULUS;

/// Number of general-purpose registers.
pub const NUM_REGISTERS: usize = 8;

/// Last operand word that names a register (`r7`).
pub const REGISTER_LAST: u16 = REGISTER_BASE + NUM_REGISTERS as u16 - 1;

/// Words of addressable program memory (offsets `0..=MAX_LITERAL`).
pub const MEMORY_WORDS: usize = MODULUS as usize;

/// Number of opcodes in the instruction set (`0..OPCODE_COUNT`).
pub const OPCODE_COUNT: u16 = 22;
