//! Hindura Core - Backend logic for the Hindura batch media converter
//!
//! This crate contains all conversion logic with zero UI dependencies.
//! It can be used by a desktop front end or a CLI tool.

pub mod config;
pub mod logging;
pub mod models;
pub mod plan;
pub mod probe;
pub mod runner;
pub mod tool;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
