#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::similar_names
)]

//! # Symbol Snap Server
//!
//! An authoritative, in-memory WebSocket room server for real-time
//! symbol-matching card games.
//!
//! Zero external dependencies at runtime — no database, no cloud
//! services. Just run the binary and connect via WebSocket.

/// Server configuration and environment variables
pub mod config;

/// Deck construction and card sets
pub mod deck;

/// Room directory (code → room handle)
pub mod directory;

/// Structured logging configuration
pub mod logging;

/// WebSocket message protocol definitions
pub mod protocol;

/// Per-room state machine and arbitration
pub mod room;

/// Server-wide shared state
pub mod server;

/// WebSocket connection handling
pub mod websocket;
