//! Small financial helpers shown next to a costing: growth rate between two
//! values and present value of a future amount.

use serde::Serialize;

use super::entities::CostingResult;

/// Longest series the projections build: 100 years of monthly periods.
pub const MAX_PERIODS: u32 = 1200;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub period: u32,
    pub value: f64,
    /// Only set on the final period.
    pub target: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiscountPoint {
    pub period: u32,
    pub future_value: f64,
    pub present_value: f64,
    pub discount_factor: f64,
}

/// Percentage change from `initial` to `final_value`. Zero when there is no
/// starting value.
pub fn growth_rate_percent(initial: f64, final_value: f64) -> f64 {
    if initial == 0.0 {
        return 0.0;
    }
    (final_value / initial - 1.0) * 100.0
}

/// Compounds the overall growth rate per period. The series always has at
/// least two points and at most `MAX_PERIODS + 1`.
pub fn growth_projection(initial: f64, final_value: f64, periods: u32) -> Vec<ProjectionPoint> {
    let periods = periods.clamp(1, MAX_PERIODS);
    let rate = growth_rate_percent(initial, final_value) / 100.0;

    (0..=periods)
        .map(|period| ProjectionPoint {
            period,
            value: initial * (1.0 + rate).powi(period as i32),
            target: (period == periods).then_some(final_value),
        })
        .collect()
}

pub fn present_value(future_value: f64, discount_percent: f64, periods: u32) -> f64 {
    future_value / discount_factor_base(discount_percent).powf(f64::from(periods))
}

pub fn discount_schedule(
    future_value: f64,
    discount_percent: f64,
    periods: u32,
) -> Vec<DiscountPoint> {
    let periods = periods.clamp(1, MAX_PERIODS);
    let base = discount_factor_base(discount_percent);

    (0..=periods)
        .map(|period| {
            let factor = 1.0 / base.powi(period as i32);
            DiscountPoint {
                period,
                future_value,
                present_value: future_value * factor,
                discount_factor: factor,
            }
        })
        .collect()
}

/// Profit as a share of the selling price, the figure buyers usually quote.
pub fn margin_on_price_percent(result: &CostingResult) -> f64 {
    if result.selling_price_per_kg <= 0.0 {
        return 0.0;
    }
    result.profit_per_kg / result.selling_price_per_kg * 100.0
}

fn discount_factor_base(discount_percent: f64) -> f64 {
    1.0 + discount_percent / 100.0
}
