//! Fetch/decode/execute loop.

use crate::console::Console;
use crate::constants::{MODULUS, VALUE_MASK};
use crate::decode::{decode, Instruction};
use crate::error::{LoadError, Result, VmError};
use crate::memory::ProgramMemory;
use crate::operand::{Location, Operand};
use crate::state::MachineState;
use tracing::{debug, trace};

/// How a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `halt` executed.
    Halted,
    /// `ret` executed with an empty stack.
    Returned,
    /// The caller's instruction limit was reached.
    StepLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Running,
    Stopped(Outcome),
}

/// Where control goes after an instruction.
enum Flow {
    Next,
    Jump(u16),
    Stop(Outcome),
}

pub struct Machine {
    memory: ProgramMemory,
    state: MachineState,
    // opcode offset of the instruction being executed, for error reports
    current: u16,
}

impl Machine {
    pub fn new(memory: ProgramMemory) -> Self {
        Self {
            memory,
            state: MachineState::new(),
            current: 0,
        }
    }

    pub fn from_words(image: &[u16]) -> std::result::Result<Self, LoadError> {
        ProgramMemory::from_words(image).map(Self::new)
    }

    pub fn memory(&self) -> &ProgramMemory {
        &self.memory
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// Value of an operand word: literals as-is, registers by content.
    pub fn resolve_value(&self, word: u16) -> Result<u16> {
        match Operand::decode(word) {
            Some(Operand::Literal(value)) => Ok(value),
            Some(Operand::Register(reg)) => Ok(self.state.get_reg(reg)),
            None => Err(self.invalid_operand(word)),
        }
    }

    /// Destination named by an operand word: registers, or a memory offset
    /// for literals.
    pub fn resolve_write_target(&self, word: u16) -> Result<Location> {
        Location::decode(word).ok_or_else(|| self.invalid_operand(word))
    }

    fn invalid_operand(&self, word: u16) -> VmError {
        VmError::InvalidOperand {
            word,
            address: self.current,
        }
    }

    fn write(&mut self, target: Location, value: u16) -> Result<()> {
        match target {
            Location::Register(reg) => {
                self.state.set_reg(reg, value);
                Ok(())
            }
            Location::Memory(offset) => self.store_memory(offset, value),
        }
    }

    fn load_memory(&self, offset: u16) -> Result<u16> {
        self.memory.load(offset).ok_or(VmError::AddressOutOfRange {
            offset,
            address: self.current,
        })
    }

    fn store_memory(&mut self, offset: u16, value: u16) -> Result<()> {
        let address = self.current;
        self.memory
            .store(offset, value)
            .ok_or(VmError::AddressOutOfRange { offset, address })
    }

    fn binary(
        &mut self,
        dst: u16,
        lhs: u16,
        rhs: u16,
        op: impl Fn(u32, u32) -> u32,
    ) -> Result<Flow> {
        let lhs = self.resolve_value(lhs)? as u32;
        let rhs = self.resolve_value(rhs)? as u32;
        let target = self.resolve_write_target(dst)?;
        self.write(target, (op(lhs, rhs) % MODULUS as u32) as u16)?;
        Ok(Flow::Next)
    }

    /// Execute one instruction.
    ///
    /// On error nothing of the failing instruction is applied and the
    /// instruction pointer still names it.
    pub fn step<C: Console>(&mut self, console: &mut C) -> Result<StepStatus> {
        let address = self.state.ip();
        let (instr, next) = decode(&self.memory, address)?;
        trace!(address, instr = %instr, "execute");
        self.current = address;

        let flow = self.execute(instr, next, console)?;
        self.state.count_step();
        match flow {
            Flow::Next => {
                self.state.set_ip(next);
                Ok(StepStatus::Running)
            }
            Flow::Jump(target) => {
                self.state.set_ip(target);
                Ok(StepStatus::Running)
            }
            Flow::Stop(outcome) => {
                self.state.set_ip(next);
                Ok(StepStatus::Stopped(outcome))
            }
        }
    }

    fn execute<C: Console>(
        &mut self,
        instr: Instruction,
        next: u16,
        console: &mut C,
    ) -> Result<Flow> {
        match instr {
            Instruction::Halt => Ok(Flow::Stop(Outcome::Halted)),
            Instruction::Set { dst, src } => {
                let value = self.resolve_value(src)?;
                let target = self.resolve_write_target(dst)?;
                self.write(target, value)?;
                Ok(Flow::Next)
            }
            Instruction::Push { src } => {
                let value = self.resolve_value(src)?;
                self.state.push(value);
                Ok(Flow::Next)
            }
            Instruction::Pop { dst } => {
                let target = self.resolve_write_target(dst)?;
                let value = self.state.pop().ok_or(VmError::StackUnderflow {
                    address: self.current,
                })?;
                self.write(target, value)?;
                Ok(Flow::Next)
            }
            Instruction::Eq { dst, lhs, rhs } => {
                self.binary(dst, lhs, rhs, |a, b| (a == b) as u32)
            }
            Instruction::Gt { dst, lhs, rhs } => {
                self.binary(dst, lhs, rhs, |a, b| (a > b) as u32)
            }
            Instruction::Jmp { target } => Ok(Flow::Jump(self.resolve_value(target)?)),
            Instruction::Jt { cond, target } => {
                let cond = self.resolve_value(cond)?;
                let target = self.resolve_value(target)?;
                Ok(if cond != 0 { Flow::Jump(target) } else { Flow::Next })
            }
            Instruction::Jf { cond, target } => {
                let cond = self.resolve_value(cond)?;
                let target = self.resolve_value(target)?;
                Ok(if cond == 0 { Flow::Jump(target) } else { Flow::Next })
            }
            Instruction::Add { dst, lhs, rhs } => self.binary(dst, lhs, rhs, |a, b| a + b),
            Instruction::Mult { dst, lhs, rhs } => self.binary(dst, lhs, rhs, |a, b| a * b),
            Instruction::Mod { dst, lhs, rhs } => {
                let lhs = self.resolve_value(lhs)?;
                let rhs = self.resolve_value(rhs)?;
                let target = self.resolve_write_target(dst)?;
                if rhs == 0 {
                    return Err(VmError::DivideByZero {
                        address: self.current,
                    });
                }
                self.write(target, (lhs % rhs) % MODULUS)?;
                Ok(Flow::Next)
            }
            Instruction::And { dst, lhs, rhs } => {
                self.binary(dst, lhs, rhs, |a, b| a & b & VALUE_MASK as u32)
            }
            Instruction::Or { dst, lhs, rhs } => {
                self.binary(dst, lhs, rhs, |a, b| (a | b) & VALUE_MASK as u32)
            }
            Instruction::Not { dst, src } => {
                let value = self.resolve_value(src)?;
                let target = self.resolve_write_target(dst)?;
                self.write(target, !value & VALUE_MASK)?;
                Ok(Flow::Next)
            }
            Instruction::Rmem { dst, addr } => {
                let offset = self.resolve_value(addr)?;
                let target = self.resolve_write_target(dst)?;
                let value = self.load_memory(offset)?;
                self.write(target, value)?;
                Ok(Flow::Next)
            }
            Instruction::Wmem { addr, src } => {
                let offset = self.resolve_value(addr)?;
                let value = self.resolve_value(src)?;
                self.store_memory(offset, value)?;
                Ok(Flow::Next)
            }
            Instruction::Call { target } => {
                let target = self.resolve_value(target)?;
                self.state.push(next);
                Ok(Flow::Jump(target))
            }
            Instruction::Ret => Ok(match self.state.pop() {
                Some(target) => Flow::Jump(target),
                None => Flow::Stop(Outcome::Returned),
            }),
            Instruction::Out { src } => {
                let value = self.resolve_value(src)?;
                // low byte only
                console.write_char((value & 0xFF) as u8)?;
                Ok(Flow::Next)
            }
            Instruction::In { dst } => {
                let target = self.resolve_write_target(dst)?;
                let byte = console.read_char()?.ok_or(VmError::InputExhausted {
                    address: self.current,
                })?;
                self.write(target, byte as u16)?;
                Ok(Flow::Next)
            }
            Instruction::Noop => Ok(Flow::Next),
        }
    }

    /// Run until halt, return on an empty stack, an error, or `max_steps`
    /// executed instructions (counted since the machine was created).
    pub fn run<C: Console>(&mut self, console: &mut C, max_steps: Option<u64>) -> Result<Outcome> {
        debug!(ip = self.state.ip(), ?max_steps, "run start");
        let result = self.run_loop(console, max_steps);
        let flushed = console.flush();
        let outcome = result?;
        flushed?;
        debug!(?outcome, steps = self.state.steps(), "run finished");
        Ok(outcome)
    }

    fn run_loop<C: Console>(
        &mut self,
        console: &mut C,
        max_steps: Option<u64>,
    ) -> Result<Outcome> {
        loop {
            if max_steps.is_some_and(|max| self.state.steps() >= max) {
                return Ok(Outcome::StepLimit);
            }
            if let StepStatus::Stopped(outcome) = self.step(console)? {
                return Ok(outcome);
            }
        }
    }
}
