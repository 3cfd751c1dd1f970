//! Configuration management for `Tessera`
//!
//! This module provides the layout settings and their TOML persistence.

pub mod settings;

pub use settings::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, LayoutSettings, LoggingSettings};
