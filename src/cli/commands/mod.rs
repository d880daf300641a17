//! Command implementations for the multidrill CLI
//!
//! Each command is organized into its own module.

pub mod compare;
pub mod config;
pub mod strategy;
pub mod worker;
