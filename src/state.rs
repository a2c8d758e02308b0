//! Register file, stack and instruction pointer.

use crate::constants::NUM_REGISTERS;
use crate::operand::Register;

#[derive(Debug, Clone, Default)]
pub struct MachineState {
    registers: [u16; NUM_REGISTERS],
    stack: Vec<u16>,
    ip: u16,
    steps: u64,
}

impl MachineState {
    pub fn new() -> Self {
        Self {
            registers: [0; NUM_REGISTERS],
            stack: Vec::with_capacity(64),
            ip: 0,
            steps: 0,
        }
    }

    pub fn get_reg(&self, reg: Register) -> u16 {
        self.registers[reg.index()]
    }

    pub fn set_reg(&mut self, reg: Register, value: u16) {
        self.registers[reg.index()] = value;
    }

    pub fn registers(&self) -> &[u16; NUM_REGISTERS] {
        &self.registers
    }

    pub fn push(&mut self, value: u16) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.stack.pop()
    }

    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    pub fn ip(&self) -> u16 {
        self.ip
    }

    pub fn set_ip(&mut self, value: u16) {
        self.ip = value;
    }

    /// Instructions executed to completion.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn count_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }
}
