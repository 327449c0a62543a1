//! Credit score inference HTTP server library
//!
//! Provides the REST API components for testing and reuse.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
