//! Disassembler for Simpletron programs.
//!
//! Converts words back to readable mnemonics. Words that do not decode to
//! an operation are shown as data.

use crate::cpu::decode::{decode, Instruction, Operation};
use crate::word::{self, Word};

/// Disassemble a single word to text.
pub fn disassemble_instruction(raw: Word) -> String {
    match decode(raw) {
        Ok(decoded) => format_instruction(&decoded),
        Err(_) => format!("DATA {}", word::format_signed(raw)),
    }
}

/// Disassemble a program listing.
///
/// The word after a DLOAD is its literal, so it is shown as data.
pub fn disassemble(words: &[Word]) -> String {
    let mut output = String::new();
    output.push_str("; Simpletron Disassembly\n");
    output.push_str("; ----------------------\n\n");

    let mut literal_next = false;
    for (addr, raw) in words.iter().enumerate() {
        let line = if literal_next {
            format!("DATA {}", word::format_signed(*raw))
        } else {
            disassemble_instruction(*raw)
        };
        literal_next = !literal_next
            && matches!(decode(*raw), Ok(Instruction { operation: Operation::DirectLoad, .. }));
        output.push_str(&format!("{:02}: {:<12} ; {}\n", addr, line, word::format_signed(*raw)));
    }

    output
}

/// Format a decoded instruction as assembly text.
fn format_instruction(instr: &Instruction) -> String {
    match instr.operation {
        Operation::Halt => "HALT".to_string(),
        op => format!("{} {:02}", op.mnemonic(), instr.operand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble_halt() {
        assert_eq!(disassemble_instruction(4300), "HALT");
    }

    #[test]
    fn test_disassemble_operand() {
        assert_eq!(disassemble_instruction(1007), "READ 07");
        assert_eq!(disassemble_instruction(3399), "MUL 99");
    }

    #[test]
    fn test_disassemble_data() {
        assert_eq!(disassemble_instruction(42), "DATA +0042");
        assert_eq!(disassemble_instruction(-4321), "DATA -4321");
    }

    #[test]
    fn test_listing_marks_direct_load_literal() {
        let listing = disassemble(&[2209, 2009, 4300]);
        let lines: Vec<&str> = listing.lines().skip(3).collect();

        assert!(lines[0].starts_with("00: DLOAD 09"));
        assert!(lines[1].starts_with("01: DATA +2009"));
        assert!(lines[2].starts_with("02: HALT"));
    }
}
