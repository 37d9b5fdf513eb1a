//! Session orchestrator that drives a chat-completions endpoint through a
//! constrained multi-step reasoning protocol.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod ui;
