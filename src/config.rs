//! Session configuration.

use crate::error::ValidationError;

/// Configuration for an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Printed before reading each line.
    pub prompt: String,
    /// Whether to print the greeting banner on start.
    pub banner: bool,
    /// Whether to print the farewell line when input runs out.
    pub farewell_on_eof: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            banner: true,
            farewell_on_eof: false,
        }
    }
}

impl SessionConfig {
    const MAX_PROMPT_LEN: usize = 32;

    /// Configuration for scripted use: no banner, no prompt.
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            prompt: String::new(),
            banner: false,
            farewell_on_eof: false,
        }
    }

    /// Checks the prompt fits on one short line.
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.prompt.len() > Self::MAX_PROMPT_LEN || self.prompt.contains('\n') {
            return Err(ValidationError::FieldTooLong {
                field: "prompt".to_string(),
                max_length: Self::MAX_PROMPT_LEN,
            });
        }
        Ok(self)
    }
}
