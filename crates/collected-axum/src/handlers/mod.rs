//! HTTP handlers for the command API.

pub mod commands;
