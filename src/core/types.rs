//! Core type definitions shared by the parser and the dispatcher

use serde::{Deserialize, Serialize};

use crate::core::error::ParseError;

/// Shown to users when the execution service failed for infrastructure reasons
pub const GENERIC_ERROR_MESSAGE: &str = "Some error occurred, try again later.\n\
If the error persists, report it to the admins in the bot's bio.";

/// A validated request to run one snippet of code
///
/// `language` and `code` are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunRequest {
    language: String,
    code: String,
    stdin: String,
}

impl RunRequest {
    /// Build a request, rejecting an empty language or empty code
    pub fn new(
        language: impl Into<String>,
        code: impl Into<String>,
        stdin: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let language = language.into();
        let code = code.into();
        if language.is_empty() {
            return Err(ParseError::MissingLanguage);
        }
        if code.is_empty() {
            return Err(ParseError::MissingCode);
        }
        Ok(Self {
            language,
            code,
            stdin: stdin.into(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Program input; empty when none was given
    pub fn stdin(&self) -> &str {
        &self.stdin
    }

    pub fn has_stdin(&self) -> bool {
        !self.stdin.is_empty()
    }

    /// Text that re-creates this request as an inline query (the "Fork" button)
    ///
    /// Stdin is deliberately left out so the forking user supplies their own.
    pub fn fork_text(&self) -> String {
        format!("{}\n{}", self.language, self.code)
    }
}

/// Outcome classes of one execution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunResult {
    /// The service ran the code; `output` is what it printed (possibly empty)
    Success,
    /// The service reported a user-facing failure (compile error, bad language, ...)
    ExecutionError,
    /// Transport or protocol failure; nothing trustworthy to show
    Unknown,
}

/// Classified answer for one `RunRequest`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResponse {
    pub request: RunRequest,
    pub result: RunResult,
    pub output: String,
}

impl RunResponse {
    pub fn success(request: RunRequest, output: impl Into<String>) -> Self {
        Self {
            request,
            result: RunResult::Success,
            output: output.into(),
        }
    }

    pub fn execution_error(request: RunRequest, message: impl Into<String>) -> Self {
        Self {
            request,
            result: RunResult::ExecutionError,
            output: message.into(),
        }
    }

    /// Infrastructure failure; never carries internal detail
    pub fn unknown(request: RunRequest) -> Self {
        Self {
            request,
            result: RunResult::Unknown,
            output: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == RunResult::Success
    }

    /// Text suitable for the user, falling back to a generic message
    pub fn user_message(&self) -> &str {
        match self.result {
            RunResult::Unknown => GENERIC_ERROR_MESSAGE,
            _ => &self.output,
        }
    }

    /// Fork payload, offered only for successful runs
    pub fn fork_text(&self) -> Option<String> {
        self.is_success().then(|| self.request.fork_text())
    }
}
