//! Configuration module.
//!
//! Supports a JSON configuration file, environment variable overrides, and
//! compiled-in defaults.
//!
//! # Module Structure
//!
//! - [`types`]: Root `Config` struct
//! - [`server`]: Room timing and capacity configuration
//! - [`logging`]: Logging configuration
//! - [`websocket`]: WebSocket connection settings
//! - [`security`]: CORS settings
//! - [`loader`]: Configuration loading functions
//! - [`validation`]: Configuration validation functions
//! - [`defaults`]: Default value functions

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod security;
pub mod server;
pub mod types;
pub mod validation;
pub mod websocket;

pub use loader::load;

pub use logging::{LogFormat, LogLevel, LoggingConfig};

pub use security::SecurityConfig;

pub use server::{RoomTimings, ServerConfig};

pub use types::Config;

pub use validation::validate_config;

pub use websocket::WebSocketConfig;
