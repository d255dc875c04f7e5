//! Shared types: config, events, persisted state and the writer/source traits.

pub mod config;
pub mod event;
pub mod staging;
pub mod state;
pub mod traits;
