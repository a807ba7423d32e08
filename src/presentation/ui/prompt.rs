use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::application::use_cases::prune_entries::ConfirmationSource;

/// Reads deletion answers from a line-oriented input.
pub struct LineConfirmation<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

/// Terminal confirmation on stdin/stderr.
pub fn stdin_confirmation() -> LineConfirmation<io::StdinLock<'static>, io::Stderr> {
    LineConfirmation::new(io::stdin().lock(), io::stderr())
}

impl<R: BufRead, W: Write> ConfirmationSource for LineConfirmation<R, W> {
    fn confirm_deletion(&mut self, display_name: &str) -> io::Result<Option<String>> {
        write!(
            self.output,
            "Delete {} from the storage file {} ",
            display_name.bold(),
            "[Y/n/a/q]".dimmed()
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(answer.trim_end_matches(['\r', '\n']).to_string()))
    }
}
