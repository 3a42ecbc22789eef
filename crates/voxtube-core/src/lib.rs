//! Core types, config, and errors for Voxtube.

pub mod config;
pub mod error;
pub mod types;
