use dialoguer::{Confirm, Input};
#[cfg(test)]
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use winpath::core::{WinPathError, WinPathResult};

/// Source of operator answers.
pub trait Prompter {
    /// One line of text. An empty answer gives `default` when there is one.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> WinPathResult<String>;

    fn confirm(&mut self, prompt: &str, default: bool) -> WinPathResult<bool>;
}

/// Asks on the terminal with dialoguer, or reads plain lines when stdin is
/// piped.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_line(prompt: &str) -> WinPathResult<Option<String>> {
        print!("{}: ", prompt);
        io::stdout()
            .flush()
            .map_err(|e| WinPathError::Input(format!("Failed to write to stdout: {}", e)))?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| WinPathError::Input(format!("Failed to read from stdin: {}", e)))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl Prompter for TerminalPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> WinPathResult<String> {
        if !io::stdin().is_terminal() {
            return match Self::read_line(prompt)? {
                Some(line) if line.is_empty() => Ok(default.unwrap_or_default().to_string()),
                Some(line) => Ok(line),
                None => Err(WinPathError::Input("end of input".to_string())),
            };
        }

        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .map_err(|e| WinPathError::Input(format!("Failed to read input: {}", e)))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> WinPathResult<bool> {
        if !io::stdin().is_terminal() {
            let hint = if default { "Y/n" } else { "y/N" };
            let answer = Self::read_line(&format!("{} ({})", prompt, hint))?
                .ok_or_else(|| WinPathError::Input("end of input".to_string()))?;
            return Ok(parse_yes_no(&answer).unwrap_or(default));
        }

        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| WinPathError::Input(format!("Failed to read confirmation: {}", e)))
    }
}

/// `y`/`yes` or `n`/`no`, any case. Anything else is `None`.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Answers queued up front, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }

    fn next(&mut self, prompt: &str) -> WinPathResult<String> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| WinPathError::Input(format!("no answer left for '{}'", prompt)))
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn input(&mut self, prompt: &str, default: Option<&str>) -> WinPathResult<String> {
        let answer = self.next(prompt)?;
        if answer.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(answer)
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> WinPathResult<bool> {
        let answer = self.next(prompt)?;
        Ok(parse_yes_no(&answer).unwrap_or(default))
    }
}
