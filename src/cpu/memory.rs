//! Simpletron memory subsystem.
//!
//! Memory is a fixed-length array of words, zeroed at construction. The
//! reference machine has 100 cells, which is exactly what a two-digit
//! operand can address; smaller memories are allowed, so every address
//! computed from an instruction goes through `addr_to_index`.

use crate::word::Word;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The number of memory cells in the reference machine.
pub const DEFAULT_MEMORY_SIZE: usize = 100;

/// Simpletron memory: a fixed number of word cells.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<Word>,
}

impl Memory {
    /// Create a new memory of `size` cells, all zeroed.
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size],
        }
    }

    /// Number of cells.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Read a cell by index.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    #[inline]
    pub fn read(&self, index: usize) -> Word {
        assert!(index < self.size(), "Memory address {} out of range (0-{})", index, self.size().saturating_sub(1));
        self.cells[index]
    }

    /// Write a cell by index.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    #[inline]
    pub fn write(&mut self, index: usize, value: Word) {
        assert!(index < self.size(), "Memory address {} out of range (0-{})", index, self.size().saturating_sub(1));
        self.cells[index] = value;
    }

    /// Validate an address taken from an instruction against the memory size.
    pub fn addr_to_index(&self, addr: i32) -> Result<usize, MemoryError> {
        match usize::try_from(addr) {
            Ok(index) if index < self.size() => Ok(index),
            _ => Err(MemoryError::AddressOutOfRange { addr, size: self.size() }),
        }
    }

    /// Store a program at consecutive addresses starting at 0.
    ///
    /// `None` entries keep their address but leave the cell untouched.
    pub fn load_program(&mut self, program: &[Option<Word>]) -> Result<(), MemoryError> {
        if program.len() > self.size() {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                available: self.size(),
            });
        }

        for (i, word) in program.iter().enumerate() {
            if let Some(word) = word {
                self.cells[i] = *word;
            }
        }

        Ok(())
    }

    /// All cells in address order.
    pub fn cells(&self) -> &[Word] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE)
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.cells.iter().filter(|cell| **cell != 0).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &self.size())
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Address is outside valid memory range.
    #[error("memory address {addr} out of range for {size} cells")]
    AddressOutOfRange { addr: i32, size: usize },
    /// Program is too large to fit in memory.
    #[error("program size {size} exceeds available space {available}")]
    ProgramTooLarge { size: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let mem = Memory::default();
        assert_eq!(mem.size(), 100);
        assert!(mem.cells().iter().all(|c| *c == 0));
    }

    #[test]
    fn test_memory_read_write() {
        let mut mem = Memory::new(10);
        mem.write(3, -42);
        assert_eq!(mem.read(3), -42);
    }

    #[test]
    #[should_panic]
    fn test_unchecked_read_out_of_range_panics() {
        let mem = Memory::new(10);
        mem.read(10);
    }

    #[test]
    fn test_memory_bounds() {
        let mem = Memory::new(10);

        assert_eq!(mem.addr_to_index(0), Ok(0));
        assert_eq!(mem.addr_to_index(9), Ok(9));

        assert_eq!(
            mem.addr_to_index(10),
            Err(MemoryError::AddressOutOfRange { addr: 10, size: 10 })
        );
        assert!(mem.addr_to_index(-1).is_err());
        assert!(mem.addr_to_index(99).is_err());
    }

    #[test]
    fn test_zero_sized_memory_has_no_addresses() {
        let mem = Memory::new(0);
        assert!(mem.addr_to_index(0).is_err());
    }

    #[test]
    fn test_load_program_skips_holes() {
        let mut mem = Memory::new(5);
        mem.write(1, 77);

        mem.load_program(&[Some(1), None, Some(3)]).unwrap();

        assert_eq!(mem.read(0), 1);
        assert_eq!(mem.read(1), 77);
        assert_eq!(mem.read(2), 3);
    }

    #[test]
    fn test_load_program_too_large() {
        let mut mem = Memory::new(2);
        let err = mem.load_program(&[Some(1), Some(2), Some(3)]).unwrap_err();
        assert_eq!(err, MemoryError::ProgramTooLarge { size: 3, available: 2 });
    }
}
