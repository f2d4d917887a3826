//! Report output
//!
//! Results go to stdout either as human-readable text (default) or as JSON.
//! Logs never share stdout; they go to stderr through `env_logger`.

pub mod json;
pub mod text;
