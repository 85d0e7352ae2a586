//! CLI library components for the PDM entity generator.

pub mod config;
pub mod logging;
