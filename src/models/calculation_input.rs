//! The input tuple for an earnings calculation.

use serde::{Deserialize, Serialize};

use super::{Rate, WorkSchedule};

/// Everything needed to reproduce a calculation: which rule set to use, the
/// declared rate and the schedule.
///
/// This is the tuple encoded into share links; decoding one yields an equal
/// `CalculationInput` and therefore an equal result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// The country id, e.g. "gb".
    pub country: String,
    /// The variant slug within the country, e.g. "standard".
    pub variant: String,
    /// The declared rate.
    pub rate: Rate,
    /// The work schedule.
    pub schedule: WorkSchedule,
}
