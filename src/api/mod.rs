//! Client modules for the inventory backend.
//!
//! This module provides:
//! - The REST client with retrying reads and single-shot mutations
//! - Error classification shared by the TUI status line and the CLI
//! - The name lookup trait backing clone-name generation

pub mod client;
pub mod error;
pub mod lookup;

pub use client::{ApiClient, RecordPage, API_TOKEN_ENV};
pub use error::ApiError;
pub use lookup::NameLookup;
