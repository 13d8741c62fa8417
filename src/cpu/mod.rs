//! CPU emulation for the Simpletron.
//!
//! This module implements the complete machine:
//! - a fixed-size memory of signed four-digit words (100 cells by default)
//! - 5 registers: accumulator, instruction counter, instruction register,
//!   operation code, operand
//! - 14-instruction set with single-address architecture

pub mod memory;
pub mod registers;
pub mod decode;
pub mod status;
pub mod execute;
mod dump;

pub use memory::{Memory, MemoryError};
pub use registers::Registers;
pub use decode::{Instruction, Operation, DecodeError};
pub use status::{Fault, Status};
pub use execute::{Machine, MachineError};
