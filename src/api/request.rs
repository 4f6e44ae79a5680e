//! Request types for the Earnings Engine API.
//!
//! This module defines the JSON request structure shared by the `/calculate`
//! and `/share` endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{CalculationInput, ExactNumber, Rate, Term, WorkSchedule};

/// Request body for the `/calculate` and `/share` endpoints.
///
/// Names the rule set by country id and variant slug, and declares the rate
/// and work schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The country id, e.g. "gb".
    pub country: String,
    /// The variant slug, e.g. "standard".
    pub variant: String,
    /// The term the rate is declared at.
    pub term: Term,
    /// The rate amount as integer and fractional parts.
    pub rate: ExactNumber,
    /// The work schedule.
    pub schedule: WorkSchedule,
}

impl From<CalculationRequest> for CalculationInput {
    fn from(req: CalculationRequest) -> Self {
        CalculationInput {
            country: req.country,
            variant: req.variant,
            rate: Rate::new(req.term, req.rate),
            schedule: req.schedule,
        }
    }
}
