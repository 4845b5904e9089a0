pub mod config;
pub mod error;
pub mod types;

pub use config::BotConfig;
pub use types::{RunRequest, RunResponse, RunResult};
