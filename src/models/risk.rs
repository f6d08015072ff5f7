//! Risk score and tier model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative risk tier, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// score < 25
    Low,
    /// 25 <= score < 50
    Moderate,
    /// 50 <= score < 75
    High,
    /// score >= 75
    Extreme,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Low, Tier::Moderate, Tier::High, Tier::Extreme];

    /// Presentation color token
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Tier::Low => "#4CAF50",
            Tier::Moderate => "#FF9800",
            Tier::High => "#F44336",
            Tier::Extreme => "#B71C1C",
        }
    }

    /// Lowest score belonging to this tier
    #[must_use]
    pub fn lower_bound(self) -> f64 {
        match self {
            Tier::Low => 0.0,
            Tier::Moderate => 25.0,
            Tier::High => 50.0,
            Tier::Extreme => 75.0,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Low => "Low",
            Tier::Moderate => "Moderate",
            Tier::High => "High",
            Tier::Extreme => "Extreme",
        };
        write!(f, "{label}")
    }
}

/// Bounded risk score with its tier and color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    /// Score in [0, 100]
    pub value: f64,
    pub tier: Tier,
    pub color: String,
}

impl RiskScore {
    /// Formats as "37.5/100 (Moderate)"
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.1}/100 ({})", self.value, self.tier)
    }
}
