//! Machine status.
//!
//! Exactly one status is active at a time, and it alone decides whether the
//! run loop continues.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Conditions that stop the machine abnormally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum Fault {
    /// The program source could not be opened.
    #[error("invalid file name")]
    InvalidFileName,

    /// A fetched word lies outside the word range.
    #[error("invalid instruction")]
    InvalidInstruction,

    /// The operation code names no operation.
    #[error("invalid operation code")]
    InvalidOperation,

    /// The accumulator left the word range.
    #[error("accumulator overflow")]
    AccumulatorOverflow,

    /// DIVIDE or REMAINDER by a zero cell.
    #[error("attempt to divide by zero")]
    DivideByZero,

    /// An operand, branch target or fetch address is past the end of memory.
    #[error("memory address {address} out of range")]
    AddressOutOfRange { address: i32 },
}

/// Current outcome of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    /// Running normally.
    #[default]
    Ok,
    /// Stopped by HALT.
    Halted,
    /// Stopped by a fault.
    Faulted(Fault),
}

impl Status {
    pub fn is_running(self) -> bool {
        self == Status::Ok
    }

    pub fn is_halted(self) -> bool {
        self == Status::Halted
    }

    pub fn fault(self) -> Option<Fault> {
        match self {
            Status::Faulted(fault) => Some(fault),
            _ => None,
        }
    }

    /// Human-readable message for this status.
    pub fn message(self) -> String {
        match self {
            Status::Ok => "execution in progress".to_string(),
            Status::Halted => "execution terminated normally".to_string(),
            Status::Faulted(fault) => fault.to_string(),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<Fault> for Status {
    fn from(fault: Fault) -> Self {
        Status::Faulted(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(Status::Ok.is_running());
        assert!(!Status::Halted.is_running());
        assert!(Status::Halted.is_halted());
        assert_eq!(
            Status::from(Fault::DivideByZero).fault(),
            Some(Fault::DivideByZero)
        );
        assert_eq!(Status::Halted.fault(), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(Status::Halted.message(), "execution terminated normally");
        assert_eq!(
            Status::Faulted(Fault::AddressOutOfRange { address: 75 }).to_string(),
            "memory address 75 out of range"
        );
        assert_eq!(Fault::DivideByZero.to_string(), "attempt to divide by zero");
    }
}
