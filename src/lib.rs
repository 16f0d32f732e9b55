//! Costing engine for processed seafood: yield losses, glazing, itemized
//! costs, VAT and a margin-driven selling price.

pub mod domain;
pub mod infra;
pub mod util;

pub use domain::{compute_costing, CostingError, CostingInput, CostingRecord, CostingResult};
