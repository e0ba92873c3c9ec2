//! Command handlers.
//!
//! Handlers are thin: read input, call the renderer or server, print.

pub mod parse;
pub mod run;
pub mod serve;
