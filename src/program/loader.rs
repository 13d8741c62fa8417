//! Program sources.
//!
//! A program is plain text, one decimal integer per line, stored at
//! consecutive addresses from 0. A line holding the terminator `-99999` or
//! any value outside the word range still takes its address but is not
//! stored, so the cell keeps whatever it held before (zero on a fresh
//! machine).
//!
//! Each line is read like C's `atoi`: leading whitespace, an optional sign
//! and the digits that follow. Anything after the number is ignored, so
//! lines may carry comments, and a line with no leading number is the
//! word 0.

use crate::word::{self, Word, SENTINEL};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory tried for relative program names that do not exist as given.
pub const FALLBACK_DIR: &str = "src";

/// A parsed program: one entry per source line, `None` for skipped lines.
pub type Image = Vec<Option<Word>>;

/// Apply the load policy to a single parsed value.
pub fn filter_word(value: i64) -> Option<Word> {
    let value = Word::try_from(value).ok()?;
    if value == SENTINEL || !word::is_valid(value) {
        return None;
    }
    Some(value)
}

/// Parse a program from any buffered reader.
pub fn parse_program<R: BufRead>(reader: R) -> Result<Image, LoadError> {
    let mut image = Image::new();

    for line_result in reader.lines() {
        let line = line_result.map_err(|e| LoadError::IoError(e.to_string()))?;
        image.push(filter_word(leading_integer(&line)));
    }

    Ok(image)
}

/// Parse a program held in a string.
pub fn parse_source(source: &str) -> Result<Image, LoadError> {
    parse_program(source.as_bytes())
}

/// Read and parse a program file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Image, LoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| LoadError::InvalidFileName {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse_program(BufReader::new(file))
}

/// Resolve a program name to a path.
///
/// Absolute paths are used as given. Relative names are joined to
/// `search_dir` when one is configured; otherwise the name is used as given
/// if it exists, falling back to `./src/<name>`.
pub fn resolve_path(name: &str, search_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Some(dir) = search_dir {
        return dir.join(path);
    }

    if path.exists() {
        return path.to_path_buf();
    }

    let fallback = Path::new(FALLBACK_DIR).join(path);
    if fallback.exists() {
        fallback
    } else {
        path.to_path_buf()
    }
}

/// Value of the integer at the start of `text`, or 0 if there is none.
///
/// Saturates instead of overflowing; anything that large is out of range
/// for a word anyway.
fn leading_integer(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')));

    if negative { -magnitude } else { magnitude }
}

/// Errors that can occur while loading a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("cannot open program {path}: {message}")]
    InvalidFileName { path: String, message: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("{0}")]
    Memory(#[from] crate::cpu::memory::MemoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_in_source_order() {
        let image = parse_source("1007\n+1008\n-42\n4300\n").unwrap();
        assert_eq!(image, vec![Some(1007), Some(1008), Some(-42), Some(4300)]);
    }

    #[test]
    fn test_sentinel_and_out_of_range_are_skipped() {
        let image = parse_source("4300\n-99999\n10000\n-10000\n99999999999999999999\n9999\n").unwrap();
        assert_eq!(image, vec![Some(4300), None, None, None, None, Some(9999)]);
    }

    #[test]
    fn test_blank_line_is_zero() {
        let image = parse_source("1\n\n  \n2").unwrap();
        assert_eq!(image, vec![Some(1), Some(0), Some(0), Some(2)]);
    }

    #[test]
    fn test_trailing_text_is_ignored() {
        let image = parse_source("1007 ; read\n4300halt\n  -42x\n").unwrap();
        assert_eq!(image, vec![Some(1007), Some(4300), Some(-42)]);
    }

    #[test]
    fn test_line_without_number_is_zero() {
        let image = parse_source("abc\n4300\n; comment\n-\n").unwrap();
        assert_eq!(image, vec![Some(0), Some(4300), Some(0), Some(0)]);
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("  +12 rest"), 12);
        assert_eq!(leading_integer("-0099"), -99);
        assert_eq!(leading_integer("1 2"), 1);
        assert_eq!(leading_integer("x1"), 0);
        assert_eq!(leading_integer("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_missing_file() {
        let err = load_file("/definitely/not/here.sml").unwrap_err();
        assert!(matches!(err, LoadError::InvalidFileName { .. }));
    }

    #[test]
    fn test_load_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("simpletron-loader-{}.sml", std::process::id()));
        std::fs::write(&path, "2007\n4300\n").unwrap();

        let image = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(image, vec![Some(2007), Some(4300)]);
    }

    #[test]
    fn test_resolve_path() {
        let dir = Path::new("/programs");
        assert_eq!(resolve_path("/abs/p.sml", Some(dir)), PathBuf::from("/abs/p.sml"));
        assert_eq!(resolve_path("p.sml", Some(dir)), PathBuf::from("/programs/p.sml"));
        assert_eq!(
            resolve_path("no-such-program.sml", None),
            PathBuf::from("no-such-program.sml")
        );
    }

    proptest! {
        #[test]
        fn filter_keeps_exactly_the_word_range(value in -200_000i64..200_000) {
            let kept = filter_word(value);
            if (-9999..=9999).contains(&value) {
                prop_assert_eq!(kept, Some(value as Word));
            } else {
                prop_assert_eq!(kept, None);
            }
        }
    }
}
