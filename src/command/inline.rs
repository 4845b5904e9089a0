//! Inline query answers
//!
//! An inline query carries the same `<language> <code>` text as `/run`,
//! but the answer is a single result card with a title and a short
//! description rather than a reply message.

use uuid::Uuid;

use crate::command::parser::parse;
use crate::command::router::CommandHandler;
use crate::core::types::{RunResponse, RunResult};

/// Which card to show for an inline query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineKind {
    /// Exactly empty query: explain the syntax
    Usage,
    /// Query could not be parsed
    BadQuery,
    Output,
    Error,
    Unknown,
}

impl InlineKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Usage => "Usage",
            Self::BadQuery => "Bad Query",
            Self::Output => "Output",
            Self::Error | Self::Unknown => "Error",
        }
    }
}

/// One inline result card
#[derive(Debug, Clone)]
pub struct InlineAnswer {
    /// Fresh per answer; the chat API requires unique result ids
    pub id: Uuid,
    pub kind: InlineKind,
    pub description: String,
    pub response: Option<RunResponse>,
}

impl InlineAnswer {
    fn new(kind: InlineKind, description: impl Into<String>, response: Option<RunResponse>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            description: description.into(),
            response,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Fork payload for a "Fork" button; only successful runs have one
    pub fn fork_text(&self) -> Option<String> {
        self.response.as_ref().and_then(RunResponse::fork_text)
    }
}

/// One-line usage hint for inline mode
pub fn inline_usage(bot_username: &str) -> String {
    format!("Usage: @{} [language] [code]", bot_username)
}

impl CommandHandler {
    /// Answer an inline query with a single classified card
    pub async fn answer_inline(&self, query: &str) -> InlineAnswer {
        if query.is_empty() {
            return InlineAnswer::new(InlineKind::Usage, inline_usage(self.bot_username()), None);
        }

        let request = match parse(query) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "Malformed inline query");
                return InlineAnswer::new(
                    InlineKind::BadQuery,
                    inline_usage(self.bot_username()),
                    None,
                );
            }
        };

        let response = self.client().execute(request).await;
        classify_inline(response)
    }
}

/// Map an execution response to its inline card
pub fn classify_inline(response: RunResponse) -> InlineAnswer {
    match response.result {
        RunResult::Success => {
            let description = response.output.clone();
            InlineAnswer::new(InlineKind::Output, description, Some(response))
        }
        RunResult::ExecutionError => {
            let description = response.output.clone();
            InlineAnswer::new(InlineKind::Error, description, Some(response))
        }
        RunResult::Unknown => InlineAnswer::new(InlineKind::Unknown, "Unknown error", Some(response)),
    }
}
