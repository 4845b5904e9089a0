//! iruncode - run code snippets from chat on a remote Piston sandbox

pub mod command;
pub mod core;
pub mod piston;
