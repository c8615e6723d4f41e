use std::{fmt, str::FromStr};

/// Resource categories backed by a metric table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum MetricCategory {
    Energy,
    Water,
    Waste,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid metric_type: {0}")]
pub struct UnknownCategory(pub String);

impl MetricCategory {
    pub const ALL: [MetricCategory; 3] = [Self::Energy, Self::Water, Self::Waste];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Energy => "ENERGY",
            Self::Water => "WATER",
            Self::Waste => "WASTE",
        }
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENERGY" => Ok(Self::Energy),
            "WATER" => Ok(Self::Water),
            "WASTE" => Ok(Self::Waste),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
