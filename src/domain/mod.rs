//! Domain logic for product costing lives here.

pub mod breakdown;
pub mod costing;
pub mod entities;
pub mod finance;
pub mod form;
pub mod record;

pub use breakdown::{cost_breakdown, CostBreakdown, CostCategory, CostShare};
pub use costing::{compute_costing, CostingError};
pub use entities::{
    CostingInput, CostingResult, LaborEntry, OverheadCosts, PackagingCosts, TransportCosts,
};
pub use finance::{
    discount_schedule, growth_projection, growth_rate_percent, margin_on_price_percent,
    present_value, DiscountPoint, ProjectionPoint, MAX_PERIODS,
};
pub use form::{normalize_input, parse_field, parse_field_bounded, FieldKind, FieldOutcome};
pub use record::CostingRecord;
