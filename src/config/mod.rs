//! Configuration and constants
//!
//! - [`defaults`] - Built-in default values
//! - [`env`] - Environment variable names
//! - [`settings`] - Optional `config.toml` settings file

pub mod defaults;
pub mod env;
pub mod settings;
