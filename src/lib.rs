//! photodeck - browse a remote photo feed and curate which photos are shown.
//!
//! This library provides the core functionality for photodeck, including:
//! - CLI command parsing and execution
//! - Terminal user interface (TUI)
//! - HTTP API for remote access
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  ┌─────────────┐  ┌─────────────┐
//! │     CLI     │  │     TUI     │  │   HTTP API  │
//! └──────┬──────┘  └──────┬──────┘  └──────┬──────┘
//!        │                │                │
//!        └────────────────┼────────────────┘
//!                         │
//!                  ┌──────┴──────┐
//!                  │    Core     │  source · disabled store · views
//!                  └─────────────┘
//! ```

pub mod api;
pub mod build_info;
pub mod cli;
pub mod config;
pub mod core;
pub mod tui;

pub use config::Config;
