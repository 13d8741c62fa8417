//! Program loading and listing.
//!
//! This module provides:
//! - A loader for line-delimited integer programs
//! - A disassembler (words → readable text)

pub mod disasm;
pub mod loader;

pub use disasm::disassemble;
pub use loader::{load_file, parse_source, resolve_path, Image, LoadError};
