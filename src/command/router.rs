//! Chat command recognition and handling
//!
//! Recognises `/help`, `/start`, `/run` and `/langs`, optionally addressed
//! as `/run@iruncode_bot`, and turns them into a transport-neutral `Reply`.

use crate::command::parser::parse;
use crate::core::types::RunResponse;
use crate::piston::PistonClient;

/// A chat command addressed to this bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// `/run` with everything after the command word
    Run(String),
    Langs,
}

impl Command {
    /// Recognise a command message
    ///
    /// Returns `None` for plain text, unknown commands, and commands
    /// addressed to a different bot.
    pub fn parse(text: &str, bot_username: &str) -> Option<Self> {
        let body = text.strip_prefix('/')?;
        let (token, args) = body
            .split_once(|c: char| c.is_whitespace())
            .unwrap_or((body, ""));

        let name = match token.split_once('@') {
            Some((name, target)) if target.eq_ignore_ascii_case(bot_username) => name,
            Some(_) => return None,
            None => token,
        };

        match name.to_ascii_lowercase().as_str() {
            "help" | "start" => Some(Self::Help),
            "run" => Some(Self::Run(args.to_string())),
            "langs" => Some(Self::Langs),
            _ => None,
        }
    }
}

/// What the transport adapter should send back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show usage help (also used for malformed `/run` text)
    Usage,
    /// A classified execution result
    Run(RunResponse),
    /// Sorted, distinct language names
    Languages(Vec<String>),
    /// Infrastructure failure; show the generic error message
    Failure,
}

/// Routes commands through the parser and the execution client
#[derive(Clone)]
pub struct CommandHandler {
    client: PistonClient,
    bot_username: String,
}

impl CommandHandler {
    pub fn new(client: PistonClient, bot_username: impl Into<String>) -> Self {
        Self {
            client,
            bot_username: bot_username.into(),
        }
    }

    pub fn client(&self) -> &PistonClient {
        &self.client
    }

    pub fn bot_username(&self) -> &str {
        &self.bot_username
    }

    /// Recognise and handle a raw message; `None` when it is not for us
    pub async fn handle_text(&self, text: &str) -> Option<Reply> {
        let command = Command::parse(text, &self.bot_username)?;
        Some(self.handle(command).await)
    }

    pub async fn handle(&self, command: Command) -> Reply {
        match command {
            Command::Help => Reply::Usage,
            Command::Run(args) => match parse(&args) {
                Ok(request) => Reply::Run(self.client.execute(request).await),
                Err(e) => {
                    tracing::debug!(error = %e, "Malformed /run command");
                    Reply::Usage
                }
            },
            Command::Langs => match self.client.languages().await {
                Ok(languages) => Reply::Languages(languages),
                Err(e) => {
                    tracing::error!(error = %e, "Could not list languages");
                    Reply::Failure
                }
            },
        }
    }
}
