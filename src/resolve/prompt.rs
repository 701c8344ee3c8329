//! Line-oriented user prompts

use std::io::{self, BufRead, Write};

use crate::error::{MetadataError, Result};

/// Where the resolver asks its questions
pub trait Prompter {
    /// Ask a question and wait for one line of input.
    ///
    /// The line terminator is stripped. End of input fails with
    /// [`MetadataError::Aborted`].
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Show a message to the user
    fn say(&mut self, message: &str) -> Result<()>;
}

/// Prompter over any line reader and writer (stdin/stdout in the binary)
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
    answers: usize,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            answers: 0,
        }
    }

    /// Number of answers read so far
    pub fn answers_read(&self) -> usize {
        self.answers
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(MetadataError::Aborted);
        }
        self.answers += 1;

        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}
