//! E-commerce shopper sessions.

pub mod catalog;
pub mod generator;
pub mod names;

pub use catalog::{ActionSelector, ActionTable};
pub use generator::SessionGenerator;
pub use names::EmbeddedNames;
