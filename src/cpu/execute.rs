//! CPU execution engine for the Simpletron.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.

use crate::console::Console;
use crate::cpu::decode::{self, Instruction, Operation};
use crate::cpu::status::{Fault, Status};
use crate::cpu::{Memory, Registers};
use crate::program::disasm::disassemble_instruction;
use crate::program::loader::{self, LoadError};
use crate::word::{self, Word};
use log::{debug, info, warn};
use serde::{Serialize, Deserialize};
use std::path::Path;
use thiserror::Error;

/// Where control goes after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transfer {
    /// Move forward by this many words.
    Advance(usize),
    /// Continue at this address.
    Jump(usize),
}

/// Result of one operation handler, before the loop applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Effect {
    status: Status,
    transfer: Transfer,
}

impl Effect {
    fn next() -> Self {
        Self { status: Status::Ok, transfer: Transfer::Advance(1) }
    }

    fn skip_literal() -> Self {
        Self { status: Status::Ok, transfer: Transfer::Advance(2) }
    }

    fn jump(addr: usize) -> Self {
        Self { status: Status::Ok, transfer: Transfer::Jump(addr) }
    }

    fn halt() -> Self {
        Self { status: Status::Halted, transfer: Transfer::Advance(1) }
    }

    fn fault(fault: Fault) -> Self {
        Self { status: Status::Faulted(fault), transfer: Transfer::Advance(0) }
    }

    /// Fold in the post-operation overflow check. The later status wins.
    fn merge_overflow(self, overflowed: bool) -> Self {
        if overflowed {
            Self { status: Status::Faulted(Fault::AccumulatorOverflow), ..self }
        } else {
            self
        }
    }
}

/// The Simpletron machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Current status.
    pub status: Status,
    /// Instructions dispatched so far. A step that faults before dispatch
    /// (bad fetch, bad word, unknown opcode) is not counted.
    pub cycles: u64,
}

impl Machine {
    /// Create a machine with `memory_size` zeroed cells.
    pub fn new(memory_size: usize) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(memory_size),
            status: Status::Ok,
            cycles: 0,
        }
    }

    /// Load words at consecutive addresses from 0.
    ///
    /// The terminator and out-of-range words are skipped, leaving their
    /// cells unchanged.
    pub fn load(&mut self, words: &[Word]) -> Result<(), LoadError> {
        let image: Vec<_> = words
            .iter()
            .map(|&w| loader::filter_word(i64::from(w)))
            .collect();
        self.load_image(&image)
    }

    /// Load an already filtered program image.
    pub fn load_image(&mut self, image: &[Option<Word>]) -> Result<(), LoadError> {
        self.mem.load_program(image)?;
        let stored = image.iter().filter(|w| w.is_some()).count();
        info!("loaded {} words ({} skipped)", stored, image.len() - stored);
        Ok(())
    }

    /// Load a program file.
    ///
    /// A file that cannot be opened also sets the status to
    /// `Faulted(InvalidFileName)`.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let image = match loader::load_file(path) {
            Ok(image) => image,
            Err(e) => {
                if matches!(e, LoadError::InvalidFileName { .. }) {
                    self.status = Status::Faulted(Fault::InvalidFileName);
                    warn!("{}", e);
                }
                return Err(e);
            }
        };
        self.load_image(&image)
    }

    /// Execute a single instruction.
    ///
    /// Returns the status after the step. Console failures are returned as
    /// errors and leave the status and instruction counter untouched.
    pub fn step<C: Console>(&mut self, console: &mut C) -> Result<Status, MachineError> {
        if !self.status.is_running() {
            return Err(MachineError::NotRunning(self.status));
        }

        // Fetch
        let ip = self.regs.instruction_counter;
        if ip >= self.mem.size() {
            return Ok(self.stop(Fault::AddressOutOfRange { address: address_of(ip) }));
        }
        let raw = self.mem.read(ip);
        self.regs.instruction_register = raw;

        if !word::is_valid(raw) {
            return Ok(self.stop(Fault::InvalidInstruction));
        }

        // Decode
        let (opcode, operand) = decode::split(raw);
        self.regs.operation_code = opcode;
        self.regs.operand = operand;

        let Some(operation) = Operation::from_code(opcode) else {
            return Ok(self.stop(Fault::InvalidOperation));
        };
        let instr = Instruction::new(operation, operand);

        // Execute
        let effect = self
            .execute(instr, console)?
            .merge_overflow(operation.writes_accumulator() && !self.regs.accumulator_in_range());

        debug!(
            "{:02}: {:<12} acc={:+05} -> {:?}",
            ip,
            disassemble_instruction(raw),
            self.regs.accumulator,
            effect.status
        );

        self.cycles += 1;

        match effect.status {
            Status::Faulted(fault) => return Ok(self.stop(fault)),
            status => self.status = status,
        }
        match effect.transfer {
            Transfer::Advance(count) => self.regs.advance(count),
            Transfer::Jump(addr) => self.regs.jump(addr),
        }

        if self.status.is_halted() {
            info!("halted after {} cycles", self.cycles);
        }
        Ok(self.status)
    }

    /// Run until halt or fault.
    ///
    /// Returns the terminal status.
    pub fn run<C: Console>(&mut self, console: &mut C) -> Result<Status, MachineError> {
        while self.status.is_running() {
            self.step(console)?;
        }

        Ok(self.status)
    }

    /// Run for at most `max_cycles` instructions.
    ///
    /// Returns the status reached, which is still `Ok` if the limit ran out.
    pub fn run_limited<C: Console>(&mut self, console: &mut C, max_cycles: u64) -> Result<Status, MachineError> {
        let limit = self.cycles.saturating_add(max_cycles);

        while self.status.is_running() && self.cycles < limit {
            self.step(console)?;
        }

        Ok(self.status)
    }

    /// Execute a decoded instruction.
    fn execute<C: Console>(&mut self, instr: Instruction, console: &mut C) -> Result<Effect, MachineError> {
        let Instruction { operation, operand } = instr;

        let effect = match operation {
            // ==================== Control Flow ====================

            Operation::Branch => self.branch(operand),

            Operation::BranchNeg => {
                if self.regs.accumulator < 0 {
                    self.branch(operand)
                } else {
                    Effect::next()
                }
            }

            Operation::BranchZero => {
                if self.regs.accumulator == 0 {
                    self.branch(operand)
                } else {
                    Effect::next()
                }
            }

            Operation::Halt => Effect::halt(),

            // Everything else addresses memory through the operand.
            _ => match self.mem.addr_to_index(operand) {
                Ok(addr) => self.access(operation, addr, console)?,
                Err(_) => Effect::fault(Fault::AddressOutOfRange { address: operand }),
            },
        };

        Ok(effect)
    }

    /// Execute an operation whose operand is a valid memory index.
    fn access<C: Console>(&mut self, operation: Operation, addr: usize, console: &mut C) -> Result<Effect, MachineError> {
        let effect = match operation {
            // ==================== Input/Output ====================

            Operation::Read => {
                let value = console.read_word()?;
                self.mem.write(addr, value);
                Effect::next()
            }

            Operation::Write => {
                console.write_word(self.mem.read(addr))?;
                Effect::next()
            }

            // ==================== Load/Store ====================

            Operation::Load => {
                self.regs.accumulator = self.mem.read(addr);
                Effect::next()
            }

            Operation::Store => {
                self.mem.write(addr, self.regs.accumulator);
                Effect::next()
            }

            Operation::DirectLoad => {
                let literal_addr = self.regs.instruction_counter + 1;
                if literal_addr >= self.mem.size() {
                    return Ok(Effect::fault(Fault::AddressOutOfRange { address: address_of(literal_addr) }));
                }
                let literal = self.mem.read(literal_addr);
                self.mem.write(addr, literal);
                Effect::skip_literal()
            }

            // ==================== Arithmetic ====================

            Operation::Add => self.arithmetic(addr, i32::checked_add),
            Operation::Subtract => self.arithmetic(addr, i32::checked_sub),
            Operation::Multiply => self.arithmetic(addr, i32::checked_mul),

            Operation::Divide | Operation::Remainder => {
                if self.mem.read(addr) == 0 {
                    Effect::fault(Fault::DivideByZero)
                } else if operation == Operation::Divide {
                    self.arithmetic(addr, i32::checked_div)
                } else {
                    self.arithmetic(addr, i32::checked_rem)
                }
            }

            Operation::Branch | Operation::BranchNeg | Operation::BranchZero | Operation::Halt => {
                unreachable!("control flow is dispatched in execute")
            }
        };

        Ok(effect)
    }

    /// Apply `op(accumulator, [addr])` to the accumulator.
    ///
    /// The result may leave the word range; the loop's overflow check deals
    /// with that. Only an i32 overflow faults here, leaving the accumulator
    /// untouched.
    fn arithmetic(&mut self, addr: usize, op: fn(i32, i32) -> Option<i32>) -> Effect {
        match op(self.regs.accumulator, self.mem.read(addr)) {
            Some(result) => {
                self.regs.accumulator = result;
                Effect::next()
            }
            None => Effect::fault(Fault::AccumulatorOverflow),
        }
    }

    fn branch(&self, target: i32) -> Effect {
        match self.mem.addr_to_index(target) {
            Ok(addr) => Effect::jump(addr),
            Err(_) => Effect::fault(Fault::AddressOutOfRange { address: target }),
        }
    }

    fn stop(&mut self, fault: Fault) -> Status {
        warn!(
            "fault at {:02}: {} (instruction {:+05})",
            self.regs.instruction_counter, fault, self.regs.instruction_register
        );
        self.status = Status::Faulted(fault);
        self.status
    }

    /// Check if the machine is halted.
    pub fn is_halted(&self) -> bool {
        self.status.is_halted()
    }

    /// Check if the machine is running.
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(crate::cpu::memory::DEFAULT_MEMORY_SIZE)
    }
}

fn address_of(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Errors that stop a step without being a machine status.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("machine not running: {0}")]
    NotRunning(Status),

    #[error("console error: {0}")]
    Console(#[from] std::io::Error),
}
