//! Command handlers for the Greyroom CLI.

pub mod config;
pub mod interactive;
pub mod progress;
pub mod run;
