//! Wire types and configuration for the student console client.

pub mod config;
pub mod types;
