//! Settings and output formats around the costing engine.

pub mod export;
pub mod settings;
