use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::costing::{compute_costing, CostingError};
use super::entities::{CostingInput, CostingResult};

/// A finished calculation as handed to exporters or batch history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostingRecord {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub computed_at: OffsetDateTime,
    pub input: CostingInput,
    pub result: CostingResult,
}

impl CostingRecord {
    /// Runs the engine and stamps the outcome with a fresh id and the
    /// current UTC time.
    pub fn compute(input: CostingInput) -> Result<Self, CostingError> {
        let result = compute_costing(&input)?;
        Ok(Self::new(input, result, OffsetDateTime::now_utc()))
    }

    pub fn new(input: CostingInput, result: CostingResult, computed_at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            computed_at,
            input,
            result,
        }
    }

    pub fn product_label(&self) -> &str {
        self.input
            .product_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Unnamed product")
    }
}
