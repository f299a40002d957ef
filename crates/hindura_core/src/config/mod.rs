//! Configuration management for Hindura.
//!
//! This module provides:
//! - TOML-based settings with logical sections
//! - Atomic section-level config updates
//! - Comment preservation via toml_edit
//!
//! # Example
//!
//! ```no_run
//! use hindura_core::config::{ConfigManager, ConfigSection};
//!
//! let mut manager = ConfigManager::new("settings.toml");
//! manager.load_or_create().unwrap();
//!
//! manager.settings_mut().paths.output_folder = "/converted".to_string();
//! manager.update_section(ConfigSection::Paths).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, ConversionSettings, PathSettings, Settings};
