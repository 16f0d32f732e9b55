//! The costing pipeline: yield losses, glazing, cost aggregation, VAT,
//! per-kilogram cost and selling price.

use thiserror::Error;

use super::entities::{CostingInput, CostingResult};

#[derive(Clone, Debug, PartialEq, Error)]
pub enum CostingError {
    #[error("{field} {reason}")]
    InvalidInput { field: String, reason: String },
    #[error("final weight is zero, cost per kg is undefined")]
    DivisionByZero,
    #[error("{field} is not representable")]
    NonFiniteResult { field: &'static str },
}

impl CostingError {
    fn invalid(field: impl Into<String>, reason: &str) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

/// Runs the full costing chain for one batch.
///
/// Stages run in a fixed order: weights first, then costs, VAT on the
/// aggregated total, and only then the division by final weight. Purchase
/// cost is always based on the initial weight.
pub fn compute_costing(input: &CostingInput) -> Result<CostingResult, CostingError> {
    validate(input)?;

    let weight_after_cleaning =
        input.initial_weight * retained_fraction(input.cleaning_loss_percent);
    let weight_after_processing =
        weight_after_cleaning * retained_fraction(input.processing_loss_percent);
    let final_weight = weight_after_processing * (1.0 + input.glazing_weight_percent / 100.0);

    let purchase_cost = input.initial_weight * input.cost_per_kg;
    let labor_cost: f64 = input.labor_entries.iter().map(|entry| entry.cost()).sum();
    let packaging_cost = input.packaging.total();
    let transport_cost = input.transport.total();
    let additional_costs = input.overhead.total();

    let total_cost_before_vat =
        purchase_cost + labor_cost + packaging_cost + transport_cost + additional_costs;
    let vat_amount = total_cost_before_vat * (input.vat_percent / 100.0);
    let total_cost_with_vat = total_cost_before_vat + vat_amount;

    if final_weight <= 0.0 {
        return Err(CostingError::DivisionByZero);
    }

    let cost_per_kg_final = total_cost_with_vat / final_weight;
    let selling_price_per_kg = cost_per_kg_final * (1.0 + input.profit_margin_percent / 100.0);
    let profit_per_kg = selling_price_per_kg - cost_per_kg_final;
    let total_profit = profit_per_kg * final_weight;

    let result = CostingResult {
        final_weight,
        purchase_cost,
        labor_cost,
        packaging_cost,
        transport_cost,
        additional_costs,
        total_cost_before_vat,
        vat_amount,
        total_cost_with_vat,
        cost_per_kg_final,
        selling_price_per_kg,
        profit_per_kg,
        total_profit,
    };

    if let Some((field, _)) = result.fields().iter().find(|(_, value)| !value.is_finite()) {
        return Err(CostingError::NonFiniteResult { field: *field });
    }

    Ok(result)
}

/// Share of weight kept after a loss stage. Losses of 100% or more keep
/// nothing rather than going negative.
fn retained_fraction(loss_percent: f64) -> f64 {
    (1.0 - loss_percent / 100.0).max(0.0)
}

/// Where a checked value sits in the input. Rendered only when a check
/// fails.
#[derive(Clone, Copy)]
enum FieldPath {
    Scalar(&'static str),
    Labor(usize, &'static str),
    Category(&'static str, &'static str),
}

impl FieldPath {
    fn render(self) -> String {
        match self {
            FieldPath::Scalar(name) => name.to_string(),
            FieldPath::Labor(idx, name) => format!("labor_entries[{idx}].{name}"),
            FieldPath::Category(group, name) => format!("{group}.{name}"),
        }
    }
}

fn checked_fields(input: &CostingInput) -> impl Iterator<Item = (FieldPath, f64)> + '_ {
    let scalars = [
        ("initial_weight", input.initial_weight),
        ("cleaning_loss_percent", input.cleaning_loss_percent),
        ("processing_loss_percent", input.processing_loss_percent),
        ("glazing_weight_percent", input.glazing_weight_percent),
        ("cost_per_kg", input.cost_per_kg),
        ("profit_margin_percent", input.profit_margin_percent),
        ("vat_percent", input.vat_percent),
    ]
    .into_iter()
    .map(|(name, value)| (FieldPath::Scalar(name), value));

    let labor = input
        .labor_entries
        .iter()
        .enumerate()
        .flat_map(|(idx, entry)| {
            [
                (FieldPath::Labor(idx, "hourly_rate"), entry.hourly_rate),
                (FieldPath::Labor(idx, "hours"), entry.hours),
            ]
        });

    scalars
        .chain(labor)
        .chain(category_fields("packaging", input.packaging.entries()))
        .chain(category_fields("transport", input.transport.entries()))
        .chain(category_fields("overhead", input.overhead.entries()))
}

fn category_fields<const N: usize>(
    group: &'static str,
    entries: [(&'static str, f64); N],
) -> impl Iterator<Item = (FieldPath, f64)> {
    entries
        .into_iter()
        .map(move |(name, amount)| (FieldPath::Category(group, name), amount))
}

fn validate(input: &CostingInput) -> Result<(), CostingError> {
    // Non-finite values are reported before any sign check.
    if let Some((path, _)) = checked_fields(input).find(|(_, value)| !value.is_finite()) {
        return Err(CostingError::invalid(path.render(), "must be a finite number"));
    }

    if input.initial_weight <= 0.0 {
        return Err(CostingError::invalid("initial_weight", "must be positive"));
    }

    if let Some((path, _)) = checked_fields(input).find(|(_, value)| *value < 0.0) {
        return Err(CostingError::invalid(path.render(), "must not be negative"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{LaborEntry, OverheadCosts, PackagingCosts, TransportCosts};

    fn sample_input() -> CostingInput {
        CostingInput {
            initial_weight: 100.0,
            cleaning_loss_percent: 10.0,
            processing_loss_percent: 5.0,
            glazing_weight_percent: 8.0,
            cost_per_kg: 5.0,
            profit_margin_percent: 25.0,
            vat_percent: 24.0,
            labor_entries: vec![LaborEntry::new(4.5, 1.0)],
            ..CostingInput::default()
        }
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn default_sheet_with_weight_yields_zero_costs() {
        let input = CostingInput {
            initial_weight: 1000.0,
            ..CostingInput::default()
        };

        let result = compute_costing(&input).unwrap();

        assert_eq!(result.final_weight, 1000.0);
        assert_eq!(result.total_cost_before_vat, 0.0);
        assert_eq!(result.cost_per_kg_final, 0.0);
        assert_eq!(result.selling_price_per_kg, 0.0);
        assert_eq!(result.total_profit, 0.0);
    }

    #[test]
    fn worked_example_matches_hand_calculation() {
        let result = compute_costing(&sample_input()).unwrap();

        assert_close(result.final_weight, 92.34, 1e-9);
        assert_close(result.purchase_cost, 500.0, 1e-9);
        assert_close(result.labor_cost, 4.5, 1e-9);
        assert_close(result.total_cost_before_vat, 504.5, 1e-9);
        assert_close(result.vat_amount, 121.08, 1e-9);
        assert_close(result.total_cost_with_vat, 625.58, 1e-9);
        assert_close(result.cost_per_kg_final, 6.7747, 1e-3);
        assert_close(result.selling_price_per_kg, 8.4684, 1e-3);
        assert_close(result.total_profit, 156.395, 1e-3);
    }

    #[test]
    fn losses_compound_instead_of_summing() {
        let input = CostingInput {
            initial_weight: 200.0,
            cleaning_loss_percent: 50.0,
            processing_loss_percent: 50.0,
            ..CostingInput::default()
        };

        let result = compute_costing(&input).unwrap();

        assert_eq!(result.final_weight, 50.0);
    }

    #[test]
    fn purchase_cost_uses_initial_weight() {
        let input = CostingInput {
            initial_weight: 100.0,
            cleaning_loss_percent: 40.0,
            cost_per_kg: 3.0,
            ..CostingInput::default()
        };

        let result = compute_costing(&input).unwrap();

        assert_eq!(result.purchase_cost, 300.0);
        assert_close(result.cost_per_kg_final, 5.0, 1e-12);
    }

    #[test]
    fn all_categories_feed_the_pre_tax_total() {
        let input = CostingInput {
            initial_weight: 10.0,
            cost_per_kg: 2.0,
            vat_percent: 10.0,
            labor_entries: vec![LaborEntry::new(10.0, 2.0), LaborEntry::new(5.0, 1.0)],
            packaging: PackagingCosts {
                box_cost: 3.0,
                bag_cost: 1.0,
            },
            transport: TransportCosts {
                fuel: 7.0,
                tolls: 1.0,
                parking: 1.0,
                driver_salary: 1.0,
            },
            overhead: OverheadCosts {
                electricity: 2.0,
                rent: 3.0,
                ..OverheadCosts::default()
            },
            ..CostingInput::default()
        };

        let result = compute_costing(&input).unwrap();

        assert_eq!(result.purchase_cost, 20.0);
        assert_eq!(result.labor_cost, 25.0);
        assert_eq!(result.packaging_cost, 4.0);
        assert_eq!(result.transport_cost, 10.0);
        assert_eq!(result.additional_costs, 5.0);
        assert_eq!(result.total_cost_before_vat, 64.0);
        assert_close(result.total_cost_with_vat, 70.4, 1e-9);
    }

    #[test]
    fn glazing_above_one_hundred_percent_is_accepted() {
        let input = CostingInput {
            initial_weight: 10.0,
            glazing_weight_percent: 150.0,
            ..CostingInput::default()
        };

        let result = compute_costing(&input).unwrap();

        assert_eq!(result.final_weight, 25.0);
    }

    #[test]
    fn full_cleaning_loss_is_division_by_zero() {
        let input = CostingInput {
            cleaning_loss_percent: 100.0,
            processing_loss_percent: 20.0,
            ..sample_input()
        };

        assert_eq!(compute_costing(&input), Err(CostingError::DivisionByZero));
    }

    #[test]
    fn loss_above_one_hundred_clamps_to_zero_weight() {
        let input = CostingInput {
            processing_loss_percent: 140.0,
            ..sample_input()
        };

        assert_eq!(compute_costing(&input), Err(CostingError::DivisionByZero));
    }

    #[test]
    fn zero_initial_weight_is_rejected() {
        let err = compute_costing(&CostingInput::default()).unwrap_err();

        assert_eq!(err.to_string(), "initial_weight must be positive");
    }

    #[test]
    fn negative_fields_name_the_offender() {
        let input = CostingInput {
            vat_percent: -1.0,
            ..sample_input()
        };
        assert_eq!(
            compute_costing(&input),
            Err(CostingError::InvalidInput {
                field: "vat_percent".to_string(),
                reason: "must not be negative".to_string(),
            })
        );

        let mut input = sample_input();
        input.labor_entries.push(LaborEntry::new(3.0, -2.0));
        let err = compute_costing(&input).unwrap_err();
        assert_eq!(err.to_string(), "labor_entries[1].hours must not be negative");

        let mut input = sample_input();
        input.overhead.insurance = -0.5;
        let err = compute_costing(&input).unwrap_err();
        assert_eq!(err.to_string(), "overhead.insurance must not be negative");
    }

    #[test]
    fn non_finite_input_is_rejected_before_sign_checks() {
        let input = CostingInput {
            initial_weight: -5.0,
            glazing_weight_percent: f64::NAN,
            ..sample_input()
        };
        let err = compute_costing(&input).unwrap_err();
        assert_eq!(err.to_string(), "glazing_weight_percent must be a finite number");

        let mut input = sample_input();
        input.transport.tolls = f64::INFINITY;
        let err = compute_costing(&input).unwrap_err();
        assert_eq!(err.to_string(), "transport.tolls must be a finite number");
    }

    #[test]
    fn first_offender_wins_in_long_labor_lists() {
        let mut input = sample_input();
        input.labor_entries = vec![LaborEntry::new(12.0, 8.0); 500];
        input.labor_entries[317].hourly_rate = -1.0;
        input.labor_entries[420].hours = f64::NAN;
        input.packaging.bag_cost = -3.0;

        let err = compute_costing(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "labor_entries[420].hours must be a finite number"
        );

        input.labor_entries[420].hours = 8.0;
        let err = compute_costing(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "labor_entries[317].hourly_rate must not be negative"
        );

        input.labor_entries[317].hourly_rate = 12.0;
        let err = compute_costing(&input).unwrap_err();
        assert_eq!(err.to_string(), "packaging.bag_cost must not be negative");
    }

    #[test]
    fn overflowing_totals_are_reported() {
        let input = CostingInput {
            initial_weight: 1e300,
            cost_per_kg: 1e300,
            ..CostingInput::default()
        };

        assert_eq!(
            compute_costing(&input),
            Err(CostingError::NonFiniteResult {
                field: "purchase_cost"
            })
        );
    }
}
