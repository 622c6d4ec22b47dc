// src/prompt.rs
use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use crate::error::ScaffoldError;

/// Re-prompts until `check` accepts the input, showing `message` on rejection.
#[derive(Clone, Copy)]
pub struct Validator {
  pub check: fn(&str) -> bool,
  pub message: &'static str,
}

/// Answers a single question.
///
/// Every method returns [`ScaffoldError::Cancelled`] when the user backs out.
pub trait Prompter {
  /// Free text entry. Empty input yields `default`.
  fn input(&mut self, message: &str, default: &str, validator: Option<Validator>) -> Result<String, ScaffoldError>;

  fn confirm(&mut self, message: &str) -> Result<bool, ScaffoldError>;

  /// Single choice among `items`, returning the chosen index.
  fn select(&mut self, message: &str, items: &[String], default: usize) -> Result<usize, ScaffoldError>;
}

/// Terminal prompts rendered by dialoguer.
pub struct TermPrompter {
  theme: ColorfulTheme,
}

impl Default for TermPrompter {
  fn default() -> Self {
    TermPrompter {
      theme: ColorfulTheme::default(),
    }
  }
}

// Ctrl-C inside a prompt surfaces as an interrupted read.
fn interaction_error(err: dialoguer::Error) -> ScaffoldError {
  match err {
    dialoguer::Error::IO(ref e) if e.kind() == io::ErrorKind::Interrupted => ScaffoldError::Cancelled,
    other => ScaffoldError::Dialoguer(other),
  }
}

impl Prompter for TermPrompter {
  fn input(&mut self, message: &str, default: &str, validator: Option<Validator>) -> Result<String, ScaffoldError> {
    let mut input = Input::<String>::with_theme(&self.theme)
      .with_prompt(message)
      .default(default.to_string());

    if let Some(validator) = validator {
      input = input.validate_with(move |value: &String| -> Result<(), &'static str> {
        if (validator.check)(value) {
          Ok(())
        } else {
          Err(validator.message)
        }
      });
    }

    input.interact_text().map_err(interaction_error)
  }

  fn confirm(&mut self, message: &str) -> Result<bool, ScaffoldError> {
    Confirm::with_theme(&self.theme)
      .with_prompt(message)
      .default(false)
      .interact_opt()
      .map_err(interaction_error)?
      .ok_or(ScaffoldError::Cancelled)
  }

  fn select(&mut self, message: &str, items: &[String], default: usize) -> Result<usize, ScaffoldError> {
    Select::with_theme(&self.theme)
      .with_prompt(message)
      .items(items)
      .default(default)
      .interact_opt()
      .map_err(interaction_error)?
      .ok_or(ScaffoldError::Cancelled)
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use std::collections::VecDeque;

  use super::*;

  #[derive(Debug, Clone)]
  pub enum Reply {
    Text(&'static str),
    Confirm(bool),
    Select(usize),
    Cancel,
  }

  /// Replays canned answers and records which prompts were shown.
  #[derive(Debug, Default)]
  pub struct ScriptedPrompter {
    replies: VecDeque<Reply>,
    pub asked: Vec<String>,
    pub rejected: Vec<String>,
  }

  impl ScriptedPrompter {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
      ScriptedPrompter {
        replies: replies.into_iter().collect(),
        ..Default::default()
      }
    }

    fn next(&mut self, message: &str) -> Reply {
      self.asked.push(message.to_string());
      self
        .replies
        .pop_front()
        .unwrap_or_else(|| panic!("no scripted reply for prompt '{}'", message))
    }
  }

  impl Prompter for ScriptedPrompter {
    fn input(&mut self, message: &str, default: &str, validator: Option<Validator>) -> Result<String, ScaffoldError> {
      loop {
        let value = match self.next(message) {
          Reply::Text("") => default.to_string(),
          Reply::Text(text) => text.to_string(),
          Reply::Cancel => return Err(ScaffoldError::Cancelled),
          other => panic!("expected text reply for '{}', got {:?}", message, other),
        };
        match validator {
          Some(v) if !(v.check)(&value) => self.rejected.push(value),
          _ => return Ok(value),
        }
      }
    }

    fn confirm(&mut self, message: &str) -> Result<bool, ScaffoldError> {
      match self.next(message) {
        Reply::Confirm(answer) => Ok(answer),
        Reply::Cancel => Err(ScaffoldError::Cancelled),
        other => panic!("expected confirm reply for '{}', got {:?}", message, other),
      }
    }

    fn select(&mut self, message: &str, items: &[String], _default: usize) -> Result<usize, ScaffoldError> {
      match self.next(message) {
        Reply::Select(index) => {
          assert!(index < items.len(), "selection {} out of range for '{}'", index, message);
          Ok(index)
        }
        Reply::Cancel => Err(ScaffoldError::Cancelled),
        other => panic!("expected select reply for '{}', got {:?}", message, other),
      }
    }
  }
}
