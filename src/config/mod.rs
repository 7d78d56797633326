//! Configuration layer for the `bioking` binary.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Headers merge: TOML headers are applied first and CLI headers with the
//! same name replace them. A bearer token (CLI, then TOML) always sets
//! `Authorization`.
//!
//! # TOML-Only Options
//!
//! Endpoint paths (`[endpoints]`) can only be changed in the config file.
//! Each is resolved against the base URL unless it is already absolute.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command, parse_datetime, parse_field};
pub use error::ConfigError;
pub use toml::{EndpointsSection, RetrySection, TomlConfig, WebhookSection, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
