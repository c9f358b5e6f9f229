//! The prayer-request submission form.
//!
//! Input is capped as it is typed: anything past [`NAME_MAX_CHARS`] or
//! [`MESSAGE_MAX_CHARS`] characters is dropped instead of being rejected
//! later. Emptiness is only checked on submit, after trimming.

use thiserror::Error;

use crate::models::NewPrayerRequest;

pub const NAME_MAX_CHARS: usize = 100;
pub const MESSAGE_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please fill in your name")]
    MissingName,
    #[error("please write your prayer request")]
    MissingMessage,
    #[error("please fill in your name and prayer request")]
    MissingNameAndMessage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionForm {
    name: String,
    message: String,
    is_public: bool,
}

impl Default for SubmissionForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            message: String::new(),
            is_public: true,
        }
    }
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn set_name(&mut self, input: &str) {
        self.name = truncate_chars(input, NAME_MAX_CHARS).to_string();
    }

    pub fn set_message(&mut self, input: &str) {
        self.message = truncate_chars(input, MESSAGE_MAX_CHARS).to_string();
    }

    pub fn set_public(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    pub fn toggle_visibility(&mut self) {
        self.is_public = !self.is_public;
    }

    /// Character counter shown under the message box, e.g. `42/500`.
    pub fn message_counter(&self) -> String {
        format!("{}/{MESSAGE_MAX_CHARS}", self.message.chars().count())
    }

    /// Build the creation request: capped, trimmed, and non-empty.
    pub fn validate(&self) -> Result<NewPrayerRequest, ValidationError> {
        let name = truncate_chars(&self.name, NAME_MAX_CHARS).trim();
        let message = truncate_chars(&self.message, MESSAGE_MAX_CHARS).trim();

        match (name.is_empty(), message.is_empty()) {
            (true, true) => Err(ValidationError::MissingNameAndMessage),
            (true, false) => Err(ValidationError::MissingName),
            (false, true) => Err(ValidationError::MissingMessage),
            (false, false) => Ok(NewPrayerRequest {
                name: name.to_string(),
                message: message.to_string(),
                is_public: self.is_public,
            }),
        }
    }

    /// Reset after a successful submission. The visibility choice is kept.
    pub fn clear(&mut self) {
        self.name.clear();
        self.message.clear();
    }
}

fn truncate_chars(input: &str, max: usize) -> &str {
    match input.char_indices().nth(max) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}
