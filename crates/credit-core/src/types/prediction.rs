//! Predicted class labels and their risk categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk category derived from the model's class label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Poor,
    Standard,
    Good,
    /// Any label outside {0, 1, 2}
    Unknown,
}

impl RiskCategory {
    /// Map a class label (0 = Poor, 1 = Standard, 2 = Good)
    pub fn from_label(label: i64) -> Self {
        match label {
            0 => RiskCategory::Poor,
            1 => RiskCategory::Standard,
            2 => RiskCategory::Good,
            _ => RiskCategory::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Poor => "Poor",
            RiskCategory::Standard => "Standard",
            RiskCategory::Good => "Good",
            RiskCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(RiskCategory::from_label(0), RiskCategory::Poor);
        assert_eq!(RiskCategory::from_label(1), RiskCategory::Standard);
        assert_eq!(RiskCategory::from_label(2), RiskCategory::Good);
    }

    #[test]
    fn test_unmapped_labels_are_unknown() {
        assert_eq!(RiskCategory::from_label(3), RiskCategory::Unknown);
        assert_eq!(RiskCategory::from_label(-1), RiskCategory::Unknown);
        assert_eq!(RiskCategory::from_label(3).to_string(), "Unknown");
    }
}
