//! Conflict prompt on the console.

use std::io::{self, BufRead, Write};

use crate::core::operations::{ConflictDecision, ConflictPrompt};

/// Asks conflict questions on a text stream and reads one-letter answers.
///
/// Invalid answers are asked again; end of input answers Abort.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn show(&mut self, title: &str, message: &str, options: &[ConflictDecision]) -> io::Result<()> {
        let choices: Vec<String> = options.iter().map(ToString::to_string).collect();
        write!(
            self.output,
            "\n--- {} ---\n{}\n{}: ",
            title,
            message,
            choices.join("  ")
        )?;
        self.output.flush()
    }

    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }
}

impl<R: BufRead, W: Write> ConflictPrompt for ConsolePrompt<R, W> {
    fn ask(&mut self, title: &str, message: &str, options: &[ConflictDecision]) -> ConflictDecision {
        if self.show(title, message, options).is_err() {
            return ConflictDecision::Abort;
        }

        loop {
            let answer = match self.read_answer() {
                Ok(Some(answer)) => answer,
                Ok(None) | Err(_) => return ConflictDecision::Abort,
            };

            let chosen = options.iter().copied().find(|option| {
                answer == option.label() || answer.chars().eq(std::iter::once(option.key()))
            });
            if let Some(decision) = chosen {
                return decision;
            }

            let keys: Vec<String> = options.iter().map(|o| o.key().to_string()).collect();
            if write!(self.output, "Please answer {}: ", keys.join(", "))
                .and_then(|_| self.output.flush())
                .is_err()
            {
                return ConflictDecision::Abort;
            }
        }
    }
}
