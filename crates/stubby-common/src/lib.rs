//! Shared vocabulary for the stubby crates.
//!
//! Everything here is needed by more than one stage of the pipeline: byte
//! spans and line lookup for diagnostics, the token vocabulary the lexer
//! produces, lexer errors, and the effect descriptor that both the generator
//! and the runtime use to tell the four recorder variants apart.

pub mod effect;
pub mod error;
pub mod span;
pub mod token;
