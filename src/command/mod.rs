//! Command pipeline
//!
//! Raw chat text -> `Command` -> `parse` -> `RunRequest` -> `PistonClient`
//! -> `RunResponse` -> `Reply` / `InlineAnswer`

pub mod inline;
pub mod parser;
pub mod router;

pub use inline::{classify_inline, InlineAnswer, InlineKind};
pub use parser::{parse, ParseError};
pub use router::{Command, CommandHandler, Reply};
