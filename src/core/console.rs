// ─── Console ───
// Blocking line-based prompts over any reader/writer pair.

use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::core::error::{ManagerError, ManagerResult};

pub const YES_TOKENS: [&str; 4] = ["Y", "y", "Yes", "yes"];
pub const NO_TOKENS: [&str; 4] = ["N", "n", "No", "no"];

/// `Some(true)` for a yes token, `Some(false)` for a no token. Case-sensitive.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    if YES_TOKENS.contains(&input) {
        Some(true)
    } else if NO_TOKENS.contains(&input) {
        Some(false)
    } else {
        None
    }
}

/// "Y, y, Yes, yes or N, n, No, no"
pub fn yes_no_options() -> String {
    format!("{} or {}", YES_TOKENS.join(", "), NO_TOKENS.join(", "))
}

/// Interactive console. Prompts are written to `output`, answers read from
/// `input` one line at a time.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> ManagerResult<()> {
        writeln!(self.output, "{line}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Read one answer without its line ending. `None` once the input is
    /// exhausted. Bytes that are not UTF-8 are replaced, so such a line is
    /// simply an answer no prompt accepts.
    pub fn read_line(&mut self) -> ManagerResult<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    /// Read one answer, failing with `InputClosed` at end of input.
    pub fn answer(&mut self) -> ManagerResult<String> {
        self.read_line()?.ok_or(ManagerError::InputClosed)
    }

    /// Print `question` and read the answer.
    pub fn ask(&mut self, question: impl Display) -> ManagerResult<String> {
        self.say(question)?;
        self.answer()
    }

    /// Ask until one of the yes/no tokens is entered.
    pub fn ask_yes_no(&mut self, question: impl Display) -> ManagerResult<bool> {
        let options = yes_no_options();
        self.say(format!("{question} ({options})"))?;
        loop {
            let answer = self.answer()?;
            if let Some(value) = parse_yes_no(&answer) {
                return Ok(value);
            }
            self.say(format!(
                "You did not select one of these options: {options}. Please try again"
            ))?;
        }
    }
}
