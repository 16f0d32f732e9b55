//! Per-category split of a computed batch cost.

use serde::Serialize;

use super::entities::CostingResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Purchase,
    Labor,
    Packaging,
    Transport,
    Overhead,
    Vat,
}

impl CostCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Purchase => "Purchase",
            Self::Labor => "Labor",
            Self::Packaging => "Packaging",
            Self::Transport => "Transport",
            Self::Overhead => "Overhead",
            Self::Vat => "VAT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CostShare {
    pub category: CostCategory,
    pub amount: f64,
    /// Share of the VAT-inclusive total, 0..=100.
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub total: f64,
    pub shares: Vec<CostShare>,
}

impl CostBreakdown {
    pub fn largest(&self) -> Option<&CostShare> {
        self.shares
            .iter()
            .filter(|share| share.amount > 0.0)
            .max_by(|a, b| a.amount.total_cmp(&b.amount))
    }
}

pub fn cost_breakdown(result: &CostingResult) -> CostBreakdown {
    let total = result.total_cost_with_vat;
    let amounts = [
        (CostCategory::Purchase, result.purchase_cost),
        (CostCategory::Labor, result.labor_cost),
        (CostCategory::Packaging, result.packaging_cost),
        (CostCategory::Transport, result.transport_cost),
        (CostCategory::Overhead, result.additional_costs),
        (CostCategory::Vat, result.vat_amount),
    ];

    let shares = amounts
        .into_iter()
        .map(|(category, amount)| CostShare {
            category,
            amount,
            percent: if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    CostBreakdown { total, shares }
}
