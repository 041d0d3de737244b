//! Assetdesk - terminal console for IT asset inventory management
//!
//! The binary drives the TUI; the library exposes the API client, the
//! record types, and the clone-naming logic for integration tests.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod naming;
pub mod registration;
pub mod types;
pub mod ui;
