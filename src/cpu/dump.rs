//! Register and memory dump.

use crate::cpu::Machine;
use crate::word;
use std::fmt::Write;

/// Cells per dump row.
const COLUMNS: usize = 10;

impl Machine {
    /// Render registers and the whole memory as the classic dump:
    ///
    /// ```text
    /// REGISTERS:
    /// accumulator          +0000
    /// instructionCounter      00
    /// ...
    /// MEMORY:
    ///         0      1      2 ...
    ///  0  +0000  +0000  +0000 ...
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_dump(&mut out);
        out
    }

    fn write_dump(&self, out: &mut String) -> std::fmt::Result {
        let regs = &self.regs;

        writeln!(out, "REGISTERS:")?;
        writeln!(out, "{:<20} {}", "accumulator", word::format_signed(regs.accumulator))?;
        writeln!(out, "{:<23} {:02}", "instructionCounter", regs.instruction_counter)?;
        writeln!(out, "{:<20} {}", "instructionRegister", word::format_signed(regs.instruction_register))?;
        writeln!(out, "{:<23} {:02}", "operationCode", regs.operation_code)?;
        writeln!(out, "{:<23} {:02}", "operand", regs.operand)?;
        writeln!(out)?;

        writeln!(out, "MEMORY:")?;
        write!(out, "{:>9}", 0)?;
        for column in 1..COLUMNS {
            write!(out, "{:>7}", column)?;
        }
        writeln!(out)?;

        for (row, cells) in self.mem.cells().chunks(COLUMNS).enumerate() {
            write!(out, "{:>2}", row * COLUMNS)?;
            for cell in cells {
                write!(out, "{:>7}", word::format_signed(*cell))?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_registers() {
        let mut m = Machine::default();
        m.regs.accumulator = -12;
        m.regs.instruction_counter = 7;
        m.regs.instruction_register = 4300;
        m.regs.operation_code = 43;

        let dump = m.dump();
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines[0], "REGISTERS:");
        assert_eq!(lines[1], "accumulator          -0012");
        assert_eq!(lines[2], "instructionCounter      07");
        assert_eq!(lines[3], "instructionRegister  +4300");
        assert_eq!(lines[4], "operationCode           43");
        assert_eq!(lines[5], "operand                 00");
    }

    #[test]
    fn test_dump_memory_grid() {
        let mut m = Machine::new(12);
        m.mem.write(0, 1007);
        m.mem.write(11, -5);

        let dump = m.dump();
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines[7], "MEMORY:");
        assert_eq!(lines[8], "        0      1      2      3      4      5      6      7      8      9");
        assert!(lines[9].starts_with(" 0  +1007  +0000"));
        assert_eq!(lines[9].len(), 2 + 7 * 10);
        assert_eq!(lines[10], "10  +0000  -0005");
        assert_eq!(lines.len(), 11);
    }
}
