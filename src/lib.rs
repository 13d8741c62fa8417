//! # Simpletron
//!
//! A single-stepping interpreter for the Simpletron machine language.
//!
//! Programs are lists of signed four-digit words. Each instruction packs an
//! operation code and a memory address into one word, and all computation
//! flows through a single accumulator.

pub mod word;
pub mod cpu;
pub mod console;
pub mod program;

// Re-export commonly used types
pub use word::{Word, MIN_WORD, MAX_WORD, SENTINEL};
pub use cpu::{Machine, MachineError, Status, Fault, Memory, Registers, Instruction, Operation};
pub use console::{Console, StreamConsole, ScriptedConsole};
pub use program::{disassemble, load_file, LoadError};
