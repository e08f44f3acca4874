// Menu selection: turns what the operator typed into positions of a listed
// menu, and abstracts where that text comes from so the flow can run
// without a terminal.

use crate::error::SelectionError;
use dialoguer::Input;
use std::collections::VecDeque;
use std::io;

/// Parse an operator's answer to a menu of `n` items.
///
/// `0` selects everything in listing order. Otherwise the answer is a
/// comma-separated list of 1-based positions, returned as 0-based indices in
/// the order typed; duplicates are kept. One bad entry rejects the whole
/// answer.
pub fn parse_selection(input: &str, n: usize) -> Result<Vec<usize>, SelectionError> {
    let input = input.trim();
    if input == "0" {
        return Ok((0..n).collect());
    }
    if input.is_empty() {
        return Err(SelectionError::Empty);
    }
    input
        .split(',')
        .map(|part| {
            let part = part.trim();
            let index: i64 = part
                .parse()
                .map_err(|_| SelectionError::NotANumber(part.to_string()))?;
            if index < 1 || index as u64 > n as u64 {
                return Err(SelectionError::OutOfRange { index, max: n });
            }
            Ok(index as usize - 1)
        })
        .collect()
}

/// Pick the ids at the parsed positions of a listing whose entries may lack
/// an id. Select-all skips those entries; naming one by number is an error.
pub fn pick(ids: &[Option<String>], input: &str) -> Result<Vec<String>, SelectionError> {
    let positions = parse_selection(input, ids.len())?;
    if input.trim() == "0" {
        return Ok(ids.iter().flatten().cloned().collect());
    }
    positions
        .into_iter()
        .map(|i| ids[i].clone().ok_or(SelectionError::NoId { index: i + 1 }))
        .collect()
}

/// Source of the operator's answers at each selection point.
pub trait Selector {
    /// Return the raw line typed for `prompt`.
    fn read(&mut self, prompt: &str) -> io::Result<String>;
}

/// Reads answers from the terminal.
#[derive(Default)]
pub struct ConsoleSelector;

impl Selector for ConsoleSelector {
    fn read(&mut self, prompt: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    }
}

/// Replays canned answers in order; runs out with an error.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSelector {
    answers: VecDeque<String>,
}

impl ScriptedSelector {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedSelector {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Selector for ScriptedSelector {
    fn read(&mut self, prompt: &str) -> io::Result<String> {
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted answer left for '{prompt}'"),
            )
        })
    }
}
