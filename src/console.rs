use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Character source for `in` and sink for `out`.
pub trait Console {
    /// Block until one byte of input is available; `None` at end of input.
    fn read_char(&mut self) -> io::Result<Option<u8>>;
    fn write_char(&mut self, byte: u8) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Console over any buffered reader and writer (stdin/stdout in the CLI).
///
/// Reading goes through the reader's buffer, so once a line has started
/// arriving the rest of it is served without blocking again.
pub struct IoConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> IoConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Console for IoConsole<R, W> {
    fn read_char(&mut self) -> io::Result<Option<u8>> {
        // Prompts written by `out` must be visible before we block.
        self.output.flush()?;
        let byte = match self.input.fill_buf()? {
            [] => return Ok(None),
            [first, ..] => *first,
        };
        self.input.consume(1);
        Ok(Some(byte))
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.output.write_all(&[byte])
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

/// In-memory console with scripted input and captured output.
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl BufferConsole {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for BufferConsole {
    fn read_char(&mut self) -> io::Result<Option<u8>> {
        Ok(self.input.pop_front())
    }

    fn write_char(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        Ok(())
    }
}
