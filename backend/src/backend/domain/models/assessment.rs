//! Domain model for a growth assessment produced by the assessment provider.
//!
//! Status labels are a closed vocabulary. Anything the provider returns is
//! normalized into [`GrowthStatus`] / [`OverallStatus`] at the boundary, and an
//! unknown label is rejected instead of being rendered unstyled.

use std::fmt;
use std::str::FromStr;

/// Classification of a single growth indicator (height, weight or BMI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowthStatus {
    Normal,
    Stunted,
    Overweight,
    Obese,
    /// Mild malnutrition, underweight form
    Underweight,
    /// Malnutrition, wasting form
    Wasted,
    /// Indicator does not apply (BMI below 70 months)
    NotApplicable,
}

/// How a status should be highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Healthy,
    Caution,
    Alert,
    Neutral,
}

/// Final verdict of an assessment. Only two values exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverallStatus {
    Normal,
    NeedsAttention,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("Unrecognized growth status label: {0:?}")]
    UnrecognizedStatus(String),
    #[error("Unrecognized overall status label: {0:?}")]
    UnrecognizedOverall(String),
}

/// Lowercase, collapse inner whitespace and drop trailing punctuation.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', '!', ';', ','])
        .to_lowercase()
}

impl GrowthStatus {
    pub const ALL: [GrowthStatus; 7] = [
        GrowthStatus::Normal,
        GrowthStatus::Stunted,
        GrowthStatus::Overweight,
        GrowthStatus::Obese,
        GrowthStatus::Underweight,
        GrowthStatus::Wasted,
        GrowthStatus::NotApplicable,
    ];

    /// Canonical label used in data files and API responses
    pub fn label(&self) -> &'static str {
        match self {
            GrowthStatus::Normal => "Normal",
            GrowthStatus::Stunted => "Stunted",
            GrowthStatus::Overweight => "Overweight",
            GrowthStatus::Obese => "Obese",
            GrowthStatus::Underweight => "Underweight",
            GrowthStatus::Wasted => "Wasted",
            GrowthStatus::NotApplicable => "Not Applicable",
        }
    }

    pub fn severity(&self) -> StatusSeverity {
        match self {
            GrowthStatus::Normal => StatusSeverity::Healthy,
            GrowthStatus::Stunted | GrowthStatus::Underweight | GrowthStatus::Wasted => {
                StatusSeverity::Caution
            }
            GrowthStatus::Overweight | GrowthStatus::Obese => StatusSeverity::Alert,
            GrowthStatus::NotApplicable => StatusSeverity::Neutral,
        }
    }
}

impl fmt::Display for GrowthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GrowthStatus {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match normalize_label(s).as_str() {
            "normal" | "bình thường" => GrowthStatus::Normal,
            "stunted" | "stunting" | "thấp còi" => GrowthStatus::Stunted,
            "overweight" | "thừa cân" => GrowthStatus::Overweight,
            "obese" | "obesity" | "béo phì" => GrowthStatus::Obese,
            "underweight" | "mildly underweight" | "suy dinh dưỡng thể nhẹ cân" => {
                GrowthStatus::Underweight
            }
            "wasted" | "wasting" | "suy dinh dưỡng thể gầy còm" => GrowthStatus::Wasted,
            "not applicable" | "n/a" | "không áp dụng" => GrowthStatus::NotApplicable,
            _ => return Err(LabelError::UnrecognizedStatus(s.to_string())),
        };
        Ok(status)
    }
}

impl OverallStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OverallStatus::Normal => "Normal",
            OverallStatus::NeedsAttention => "Needs Attention",
        }
    }

    pub fn needs_attention(&self) -> bool {
        matches!(self, OverallStatus::NeedsAttention)
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OverallStatus {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "normal" | "bình thường" => Ok(OverallStatus::Normal),
            "needs attention" | "cần chú ý" => Ok(OverallStatus::NeedsAttention),
            _ => Err(LabelError::UnrecognizedOverall(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub title: String,
    pub details: String,
}

/// A validated assessment. Immutable once attached to a measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub height_status: GrowthStatus,
    pub weight_status: GrowthStatus,
    pub bmi_status: GrowthStatus,
    pub summary: String,
    pub advice: Vec<Advice>,
    pub overall_status: OverallStatus,
}

impl Assessment {
    /// Build an assessment from raw provider labels, rejecting unknown ones.
    pub fn from_labels(
        height_status: &str,
        weight_status: &str,
        bmi_status: &str,
        overall_status: &str,
        summary: impl Into<String>,
        advice: Vec<Advice>,
    ) -> Result<Self, LabelError> {
        Ok(Self {
            height_status: height_status.parse()?,
            weight_status: weight_status.parse()?,
            bmi_status: bmi_status.parse()?,
            summary: summary.into().trim().to_string(),
            advice,
            overall_status: overall_status.parse()?,
        })
    }

    /// Worst severity across the three indicators
    pub fn worst_severity(&self) -> StatusSeverity {
        let rank = |s: StatusSeverity| match s {
            StatusSeverity::Alert => 3,
            StatusSeverity::Caution => 2,
            StatusSeverity::Healthy => 1,
            StatusSeverity::Neutral => 0,
        };
        [self.height_status, self.weight_status, self.bmi_status]
            .into_iter()
            .map(|s| s.severity())
            .max_by_key(|s| rank(*s))
            .unwrap_or(StatusSeverity::Neutral)
    }
}
