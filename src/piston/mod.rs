//! Remote execution service access

pub mod client;

pub use client::{classify, unique_languages, PistonClient, Runtime};
