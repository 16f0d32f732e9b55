use serde::{Deserialize, Serialize};

/// One worker line on the costing sheet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LaborEntry {
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub hours: f64,
}

impl LaborEntry {
    pub fn new(hourly_rate: f64, hours: f64) -> Self {
        Self { hourly_rate, hours }
    }

    pub fn cost(&self) -> f64 {
        self.hourly_rate * self.hours
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingCosts {
    pub box_cost: f64,
    pub bag_cost: f64,
}

impl PackagingCosts {
    pub fn entries(&self) -> [(&'static str, f64); 2] {
        [("box_cost", self.box_cost), ("bag_cost", self.bag_cost)]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, amount)| amount).sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportCosts {
    pub fuel: f64,
    pub tolls: f64,
    pub parking: f64,
    pub driver_salary: f64,
}

impl TransportCosts {
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("fuel", self.fuel),
            ("tolls", self.tolls),
            ("parking", self.parking),
            ("driver_salary", self.driver_salary),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, amount)| amount).sum()
    }
}

/// Running costs of the plant attributed to this batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverheadCosts {
    pub electricity: f64,
    pub equipment: f64,
    pub insurance: f64,
    pub rent: f64,
    pub communication: f64,
    pub other: f64,
}

impl OverheadCosts {
    pub fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("electricity", self.electricity),
            ("equipment", self.equipment),
            ("insurance", self.insurance),
            ("rent", self.rent),
            ("communication", self.communication),
            ("other", self.other),
        ]
    }

    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, amount)| amount).sum()
    }
}

/// Everything the engine needs for one batch.
///
/// Every field has a zero default so partially filled sheets deserialize;
/// whether the values make sense is decided by
/// [`compute_costing`](super::costing::compute_costing).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostingInput {
    /// Label carried through to exports, never used in arithmetic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Raw material weight in kilograms.
    pub initial_weight: f64,
    pub cleaning_loss_percent: f64,
    pub processing_loss_percent: f64,
    /// Weight added by the ice glaze. Not bounded by 100.
    pub glazing_weight_percent: f64,
    /// Purchase price per kilogram of *initial* weight.
    pub cost_per_kg: f64,
    pub profit_margin_percent: f64,
    pub vat_percent: f64,
    pub labor_entries: Vec<LaborEntry>,
    pub packaging: PackagingCosts,
    pub transport: TransportCosts,
    pub overhead: OverheadCosts,
}

/// Derived figures for one batch. Values are unrounded; rounding is a
/// display concern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostingResult {
    pub final_weight: f64,
    pub purchase_cost: f64,
    pub labor_cost: f64,
    pub packaging_cost: f64,
    pub transport_cost: f64,
    pub additional_costs: f64,
    pub total_cost_before_vat: f64,
    pub vat_amount: f64,
    pub total_cost_with_vat: f64,
    pub cost_per_kg_final: f64,
    pub selling_price_per_kg: f64,
    pub profit_per_kg: f64,
    pub total_profit: f64,
}

impl CostingResult {
    /// Revenue when the whole final weight sells at the computed price.
    pub fn revenue(&self) -> f64 {
        self.selling_price_per_kg * self.final_weight
    }

    /// Field name / value pairs in a stable order, used by the exporters.
    pub fn fields(&self) -> [(&'static str, f64); 13] {
        [
            ("final_weight", self.final_weight),
            ("purchase_cost", self.purchase_cost),
            ("labor_cost", self.labor_cost),
            ("packaging_cost", self.packaging_cost),
            ("transport_cost", self.transport_cost),
            ("additional_costs", self.additional_costs),
            ("total_cost_before_vat", self.total_cost_before_vat),
            ("vat_amount", self.vat_amount),
            ("total_cost_with_vat", self.total_cost_with_vat),
            ("cost_per_kg_final", self.cost_per_kg_final),
            ("selling_price_per_kg", self.selling_price_per_kg),
            ("profit_per_kg", self.profit_per_kg),
            ("total_profit", self.total_profit),
        ]
    }
}
