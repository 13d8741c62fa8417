//! Input and output devices for the READ and WRITE operations.

use crate::word::{self, Word};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Source and sink of words for a running machine.
pub trait Console {
    /// Block until one word is available.
    fn read_word(&mut self) -> io::Result<Word>;

    /// Emit one word.
    fn write_word(&mut self, value: Word) -> io::Result<()>;
}

/// Console over any buffered reader and writer.
///
/// Input is a stream of whitespace-separated integers; no prompt is shown.
/// Each written word goes on its own line.
pub struct StreamConsole<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> StreamConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> io::Result<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input ended before READ could be satisfied",
                ));
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

impl StreamConsole<io::StdinLock<'static>, io::Stdout> {
    /// Console bound to the process's standard streams.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for StreamConsole<R, W> {
    fn read_word(&mut self) -> io::Result<Word> {
        let token = self.next_token()?;
        let value: Word = token.parse().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, format!("not an integer: {:?}", token))
        })?;

        if !word::is_valid(value) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("input {} is outside the word range", value),
            ));
        }

        Ok(value)
    }

    fn write_word(&mut self, value: Word) -> io::Result<()> {
        writeln!(self.output, "{}", value)?;
        self.output.flush()
    }
}

/// In-memory console with queued input and captured output.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<Word>,
    outputs: Vec<Word>,
}

impl ScriptedConsole {
    pub fn new(inputs: impl IntoIterator<Item = Word>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            outputs: Vec::new(),
        }
    }

    /// Words written so far.
    pub fn outputs(&self) -> &[Word] {
        &self.outputs
    }
}

impl Console for ScriptedConsole {
    fn read_word(&mut self) -> io::Result<Word> {
        self.inputs.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted input left")
        })
    }

    fn write_word(&mut self, value: Word) -> io::Result<()> {
        self.outputs.push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_reads_tokens_across_lines() {
        let input = b"7 13\n  -4\n" as &[u8];
        let mut console = StreamConsole::new(input, Vec::new());

        assert_eq!(console.read_word().unwrap(), 7);
        assert_eq!(console.read_word().unwrap(), 13);
        assert_eq!(console.read_word().unwrap(), -4);
        assert_eq!(
            console.read_word().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_stream_rejects_garbage_and_out_of_range() {
        let mut console = StreamConsole::new(b"abc 10000\n" as &[u8], Vec::new());
        assert_eq!(console.read_word().unwrap_err().kind(), io::ErrorKind::InvalidData);
        assert_eq!(console.read_word().unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_stream_writes_lines() {
        let mut console = StreamConsole::new(b"" as &[u8], Vec::new());
        console.write_word(20).unwrap();
        console.write_word(-3).unwrap();
        assert_eq!(console.output, b"20\n-3\n");
    }

    #[test]
    fn test_scripted_console() {
        let mut console = ScriptedConsole::new([1, 2]);
        assert_eq!(console.read_word().unwrap(), 1);
        console.write_word(9).unwrap();
        assert_eq!(console.read_word().unwrap(), 2);
        assert!(console.read_word().is_err());
        assert_eq!(console.outputs(), &[9]);
    }
}
