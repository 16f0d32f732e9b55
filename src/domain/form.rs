//! Normalization of user-typed field text before it reaches the engine.
//!
//! The engine rejects anything odd. This layer is where lenient policies live:
//! blank means zero, out-of-range values are clamped, obvious script
//! payloads are dropped. Like a browser number field, only the leading
//! number counts: `"12kg"` reads as 12.

use tracing::{debug, warn};

use super::entities::CostingInput;

/// Upper bound for any single field.
pub const MAX_SAFE_VALUE: f64 = 999_999_999.0;

const BLOCKED_MARKERS: [&str; 3] = ["<script", "javascript:", "vbscript:"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Weight,
    Percentage,
    Amount,
}

impl FieldKind {
    pub fn default_max(&self) -> Option<f64> {
        match self {
            FieldKind::Percentage => Some(100.0),
            FieldKind::Weight | FieldKind::Amount => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldOutcome {
    Accepted(f64),
    /// Value was clamped into range; `to` is what the caller should store.
    Adjusted { from: f64, to: f64 },
    /// Input is ignored and the previous value stays.
    Rejected,
}

impl FieldOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            FieldOutcome::Accepted(value) => Some(*value),
            FieldOutcome::Adjusted { to, .. } => Some(*to),
            FieldOutcome::Rejected => None,
        }
    }
}

/// Parses one field with the kind's default bounds.
pub fn parse_field(raw: &str, kind: FieldKind) -> FieldOutcome {
    parse_field_bounded(raw, 0.0, kind.default_max())
}

pub fn parse_field_bounded(raw: &str, min: f64, max: Option<f64>) -> FieldOutcome {
    let lowered = raw.to_ascii_lowercase();
    if BLOCKED_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        warn!("blocked suspicious field input");
        return FieldOutcome::Rejected;
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldOutcome::Accepted(0.0);
    }

    let Some(parsed) = leading_number(trimmed) else {
        return FieldOutcome::Rejected;
    };

    let mut value = parsed.max(min);
    if let Some(max) = max {
        value = value.min(max);
    }
    value = value.min(MAX_SAFE_VALUE);

    if (value - parsed).abs() > 0.01 {
        debug!(from = parsed, to = value, "field value adjusted");
        FieldOutcome::Adjusted {
            from: parsed,
            to: value,
        }
    } else {
        FieldOutcome::Accepted(value)
    }
}

/// Longest numeric prefix of `text`, or `None` when it does not start with
/// a number. Trailing text such as units is ignored.
fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    if text[end..].starts_with("Infinity") {
        return text[..end + "Infinity".len()].parse().ok();
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Coerces non-finite and negative numbers to zero.
///
/// Zero initial weight is left alone, so the engine still reports it.
pub fn normalize_input(input: &CostingInput) -> CostingInput {
    let mut adjusted = 0_usize;
    let mut fix = |value: &mut f64| {
        if !value.is_finite() || *value < 0.0 {
            *value = 0.0;
            adjusted += 1;
        }
    };

    let mut out = input.clone();
    fix(&mut out.initial_weight);
    fix(&mut out.cleaning_loss_percent);
    fix(&mut out.processing_loss_percent);
    fix(&mut out.glazing_weight_percent);
    fix(&mut out.cost_per_kg);
    fix(&mut out.profit_margin_percent);
    fix(&mut out.vat_percent);
    for entry in &mut out.labor_entries {
        fix(&mut entry.hourly_rate);
        fix(&mut entry.hours);
    }
    fix(&mut out.packaging.box_cost);
    fix(&mut out.packaging.bag_cost);
    fix(&mut out.transport.fuel);
    fix(&mut out.transport.tolls);
    fix(&mut out.transport.parking);
    fix(&mut out.transport.driver_salary);
    fix(&mut out.overhead.electricity);
    fix(&mut out.overhead.equipment);
    fix(&mut out.overhead.insurance);
    fix(&mut out.overhead.rent);
    fix(&mut out.overhead.communication);
    fix(&mut out.overhead.other);

    if adjusted > 0 {
        debug!(adjusted, "normalized costing input");
    }
    out
}
