//! Spend category classification
//!
//! Category labels from providers are free text ("Streaming Services",
//! "TRAVEL", "Food and Drink"). The chart only distinguishes three groups,
//! picked by an ordered keyword table so the mapping stays auditable.

use serde::{Deserialize, Serialize};

/// Chart grouping for an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendCategory {
    Essentials,
    Leisure,
    Subscriptions,
}

impl SpendCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Essentials => "essentials",
            Self::Leisure => "leisure",
            Self::Subscriptions => "subscriptions",
        }
    }
}

impl std::fmt::Display for SpendCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keyword rules, checked top to bottom against the uppercased label.
/// First match wins.
pub const CATEGORY_RULES: &[(&str, SpendCategory)] = &[
    ("SUBSCRIPT", SpendCategory::Subscriptions),
    ("SERVICE", SpendCategory::Subscriptions),
    ("STREAM", SpendCategory::Subscriptions),
    ("ENTERTAIN", SpendCategory::Leisure),
    ("TRAVEL", SpendCategory::Leisure),
    ("TRANSPORT", SpendCategory::Leisure),
    ("RECREATION", SpendCategory::Leisure),
];

/// Classify a provider category label
pub fn classify(label: Option<&str>) -> SpendCategory {
    let Some(label) = label else {
        return SpendCategory::Essentials;
    };
    let upper = label.to_uppercase();

    CATEGORY_RULES
        .iter()
        .find(|(keyword, _)| upper.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(SpendCategory::Essentials)
}
