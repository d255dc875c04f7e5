//! Sessionlog library crate.
//!
//! Synthesizes shopper session logs and writes them as JSON and CSV, keeping
//! user and session IDs increasing across runs.

pub mod core;
pub mod formats;
pub mod runner;
pub mod sources;

pub use self::core::config;
pub use self::core::event;
pub use self::core::state;
pub use self::core::traits;
