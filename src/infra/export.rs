//! Text, CSV and JSON renderings of a finished calculation.
//!
//! Rounding happens here and nowhere else.

use std::fmt;

use thiserror::Error;
use time::{macros::format_description, Date};

use crate::domain::{cost_breakdown, margin_on_price_percent, CostingRecord, CostingResult};
use crate::infra::settings::Settings;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Format(#[from] time::error::Format),
}

pub fn render_summary(record: &CostingRecord, settings: &Settings) -> String {
    Summary { record, settings }.to_string()
}

struct Summary<'a> {
    record: &'a CostingRecord,
    settings: &'a Settings,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, self.record, self.settings)
    }
}

pub fn write_summary(
    out: &mut impl fmt::Write,
    record: &CostingRecord,
    settings: &Settings,
) -> fmt::Result {
    let result = &record.result;
    let input = &record.input;
    let cur = settings.currency.as_str();
    let dp = settings.decimals;

    writeln!(out, "{}", record.product_label())?;
    writeln!(out, "  Initial weight      {:.dp$} kg", input.initial_weight)?;
    writeln!(out, "  Final weight        {:.dp$} kg", result.final_weight)?;
    writeln!(out)?;
    writeln!(out, "  Purchase            {cur}{:.dp$}", result.purchase_cost)?;
    writeln!(out, "  Labor               {cur}{:.dp$}", result.labor_cost)?;
    writeln!(out, "  Packaging           {cur}{:.dp$}", result.packaging_cost)?;
    writeln!(out, "  Transport           {cur}{:.dp$}", result.transport_cost)?;
    writeln!(out, "  Overhead            {cur}{:.dp$}", result.additional_costs)?;
    writeln!(
        out,
        "  Total before VAT    {cur}{:.dp$}",
        result.total_cost_before_vat
    )?;
    writeln!(
        out,
        "  VAT ({}%)           {cur}{:.dp$}",
        input.vat_percent, result.vat_amount
    )?;
    writeln!(
        out,
        "  Total cost          {cur}{:.dp$}",
        result.total_cost_with_vat
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  Cost per kg         {cur}{:.dp$}/kg",
        result.cost_per_kg_final
    )?;
    writeln!(
        out,
        "  Selling price       {cur}{:.dp$}/kg",
        result.selling_price_per_kg
    )?;
    writeln!(
        out,
        "  Profit per kg       {cur}{:.dp$}/kg",
        result.profit_per_kg
    )?;
    writeln!(out, "  Revenue             {cur}{:.dp$}", result.revenue())?;
    writeln!(out, "  Total profit        {cur}{:.dp$}", result.total_profit)?;
    writeln!(
        out,
        "  Margin on price     {:.1}%",
        margin_on_price_percent(result)
    )?;

    if let Some(largest) = cost_breakdown(result).largest() {
        writeln!(
            out,
            "  Largest cost        {} ({:.1}%)",
            largest.category.label(),
            largest.percent
        )?;
    }

    Ok(())
}

/// `field,value` rows at full precision.
pub fn render_csv(result: &CostingResult) -> String {
    let mut out = String::from("field,value\n");
    for (field, value) in result.fields() {
        out.push_str(&format!("{field},{value}\n"));
    }
    out
}

pub fn render_json(record: &CostingRecord) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Download name used for CSV exports, e.g. `calculation-2024-03-01.csv`.
pub fn csv_file_name(date: Date) -> Result<String, ExportError> {
    let stamp = date.format(format_description!("[year]-[month]-[day]"))?;
    Ok(format!("calculation-{stamp}.csv"))
}
