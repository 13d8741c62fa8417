//! Simpletron CPU registers.
//!
//! The machine has five registers:
//! - accumulator: the only arithmetic register
//! - instruction counter: address of the next instruction
//! - instruction register: the last fetched word
//! - operation code and operand: the decoded halves of that word

use crate::word::{self, Word};
use serde::{Serialize, Deserialize};

/// The Simpletron register file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// Accumulator. May hold an out-of-range value once overflow has fired.
    pub accumulator: Word,

    /// Address of the next instruction to fetch.
    pub instruction_counter: usize,

    /// Raw word fetched by the last cycle.
    pub instruction_register: Word,

    /// Operation code decoded from the instruction register.
    pub operation_code: i32,

    /// Operand decoded from the instruction register.
    pub operand: i32,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the instruction counter by `count` words.
    pub fn advance(&mut self, count: usize) {
        self.instruction_counter += count;
    }

    /// Set the instruction counter to an absolute address.
    pub fn jump(&mut self, addr: usize) {
        self.instruction_counter = addr;
    }

    /// Whether the accumulator still fits in a word.
    pub fn accumulator_in_range(&self) -> bool {
        word::is_valid(self.accumulator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let mut regs = Registers::new();
        regs.instruction_counter = 10;

        regs.advance(1);
        assert_eq!(regs.instruction_counter, 11);

        regs.advance(2);
        assert_eq!(regs.instruction_counter, 13);
    }

    #[test]
    fn test_accumulator_range() {
        let mut regs = Registers::new();
        regs.accumulator = 9999;
        assert!(regs.accumulator_in_range());
        regs.accumulator = 10000;
        assert!(!regs.accumulator_in_range());
        regs.accumulator = -10000;
        assert!(!regs.accumulator_in_range());
    }
}
