//! pstop - live dashboard over MySQL performance_schema.
//!
//! The library holds everything except argument parsing and process setup,
//! which live in the `pstop` binary.

pub mod collector;
pub mod connection;
pub mod fmt;
pub mod model;
pub mod munge;
pub mod tui;
pub mod view;
