//! Machine words.
//!
//! A word is a signed decimal integer of four digits plus sign. Both
//! instructions and data are stored as words, and the accumulator holds one
//! (although it may briefly leave the range before the overflow check).

/// A single memory cell or register value.
pub type Word = i32;

/// Smallest representable word.
pub const MIN_WORD: Word = -9999;

/// Largest representable word.
pub const MAX_WORD: Word = 9999;

/// Terminator value in program sources. Never stored.
pub const SENTINEL: Word = -99999;

/// Check whether a value fits in a word.
#[inline]
pub fn is_valid(value: Word) -> bool {
    (MIN_WORD..=MAX_WORD).contains(&value)
}

/// Format a word the way the dump shows it: sign and four digits.
pub fn format_signed(value: Word) -> String {
    format!("{:+05}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(is_valid(MIN_WORD));
        assert!(is_valid(MAX_WORD));
        assert!(is_valid(0));
        assert!(!is_valid(MAX_WORD + 1));
        assert!(!is_valid(MIN_WORD - 1));
        assert!(!is_valid(SENTINEL));
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(0), "+0000");
        assert_eq!(format_signed(42), "+0042");
        assert_eq!(format_signed(-7), "-0007");
        assert_eq!(format_signed(10000), "+10000");
    }
}
