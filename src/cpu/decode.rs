//! Instruction decoder for the Simpletron.
//!
//! An instruction is a single word. The operation code is the word divided
//! by 100 and the operand is the remainder, both truncated toward zero, so
//! `-4321` splits into `(-43, -21)`. Rust's `/` and `%` on integers already
//! truncate, which is what the machine wants; `div_euclid` would not.

use crate::word::{self, Word};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Operations of the Simpletron machine language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    // ==================== Input/Output ====================

    /// Read a word from the input into memory.
    Read,
    /// Write a word from memory to the output.
    Write,

    // ==================== Load/Store ====================

    /// accumulator := [addr]
    Load,
    /// [addr] := accumulator
    Store,
    /// [addr] := the word following this instruction
    DirectLoad,

    // ==================== Arithmetic ====================

    /// accumulator += [addr]
    Add,
    /// accumulator -= [addr]
    Subtract,
    /// accumulator /= [addr]
    Divide,
    /// accumulator *= [addr]
    Multiply,
    /// accumulator %= [addr]
    Remainder,

    // ==================== Control Flow ====================

    /// Unconditional branch
    Branch,
    /// Branch if accumulator < 0
    BranchNeg,
    /// Branch if accumulator == 0
    BranchZero,
    /// Stop execution
    Halt,
}

impl Operation {
    /// Every operation, in opcode order.
    pub const ALL: [Operation; 14] = [
        Operation::Read,
        Operation::Write,
        Operation::Load,
        Operation::Store,
        Operation::DirectLoad,
        Operation::Add,
        Operation::Subtract,
        Operation::Divide,
        Operation::Multiply,
        Operation::Remainder,
        Operation::Branch,
        Operation::BranchNeg,
        Operation::BranchZero,
        Operation::Halt,
    ];

    /// Look up an operation by its numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        let op = match code {
            10 => Operation::Read,
            11 => Operation::Write,
            20 => Operation::Load,
            21 => Operation::Store,
            22 => Operation::DirectLoad,
            30 => Operation::Add,
            31 => Operation::Subtract,
            32 => Operation::Divide,
            33 => Operation::Multiply,
            34 => Operation::Remainder,
            40 => Operation::Branch,
            41 => Operation::BranchNeg,
            42 => Operation::BranchZero,
            43 => Operation::Halt,
            _ => return None,
        };
        Some(op)
    }

    /// Numeric code of this operation.
    pub fn code(self) -> i32 {
        match self {
            Operation::Read => 10,
            Operation::Write => 11,
            Operation::Load => 20,
            Operation::Store => 21,
            Operation::DirectLoad => 22,
            Operation::Add => 30,
            Operation::Subtract => 31,
            Operation::Divide => 32,
            Operation::Multiply => 33,
            Operation::Remainder => 34,
            Operation::Branch => 40,
            Operation::BranchNeg => 41,
            Operation::BranchZero => 42,
            Operation::Halt => 43,
        }
    }

    /// Assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Operation::Read => "READ",
            Operation::Write => "WRITE",
            Operation::Load => "LOAD",
            Operation::Store => "STORE",
            Operation::DirectLoad => "DLOAD",
            Operation::Add => "ADD",
            Operation::Subtract => "SUB",
            Operation::Divide => "DIV",
            Operation::Multiply => "MUL",
            Operation::Remainder => "REM",
            Operation::Branch => "BRANCH",
            Operation::BranchNeg => "BRNEG",
            Operation::BranchZero => "BRZERO",
            Operation::Halt => "HALT",
        }
    }

    /// Whether executing this operation writes the accumulator
    /// and therefore needs the overflow check afterwards.
    pub fn writes_accumulator(self) -> bool {
        matches!(
            self,
            Operation::Load
                | Operation::Add
                | Operation::Subtract
                | Operation::Divide
                | Operation::Multiply
                | Operation::Remainder
        )
    }
}

/// A decoded instruction: an operation and its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub operation: Operation,
    pub operand: i32,
}

impl Instruction {
    pub fn new(operation: Operation, operand: i32) -> Self {
        Self { operation, operand }
    }
}

/// Split a word into `(opcode, operand)` using truncating division.
#[inline]
pub fn split(word: Word) -> (i32, i32) {
    (word / 100, word % 100)
}

/// Decode a word into an instruction.
///
/// Fails if the word is not a valid word at all, or if its opcode names
/// no operation.
pub fn decode(word: Word) -> Result<Instruction, DecodeError> {
    if !word::is_valid(word) {
        return Err(DecodeError::InvalidInstruction(word));
    }

    let (opcode, operand) = split(word);
    let operation = Operation::from_code(opcode)
        .ok_or(DecodeError::InvalidOperation(opcode))?;

    Ok(Instruction::new(operation, operand))
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid instruction word: {0}")]
    InvalidInstruction(Word),

    #[error("invalid operation code: {0}")]
    InvalidOperation(i32),
}
