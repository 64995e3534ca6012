//! Configuration module
//!
//! Provides types and loading for `tilescape.toml`.

pub mod loader;
pub mod schema;

pub use loader::{find_config, find_config_from, load_config, load_config_file, ConfigError};
pub use schema::*;
